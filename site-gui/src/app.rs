use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use eframe::egui::{self, Color32, Rounding, Stroke};
use serde_json::Value;
use site_core::dates::relative_label_for;
use site_core::{
    validate_form, CarouselDriver, FieldError, FieldKind, FieldSpec, GalleryFilter, GalleryItem, Language,
    PageEvent, PageSnapshot, ProfileImage, ProfileRouter, RefresherHandle, Section, Signal, SiteContext, Story, StoryClicked,
    Testimonial,
};
use tokio::runtime::Runtime;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use crate::widgets::{carousel, CarouselInput};

const PROFILE_SECTIONS: [&str; 6] = ["biography", "initiatives", "events", "campaigns", "gallery", "testimonials"];

pub struct AppInit {
    pub runtime: Arc<Runtime>,
    pub ctx: Arc<SiteContext>,
    pub refresher: RefresherHandle,
    pub updates: mpsc::Receiver<PageEvent>,
    pub initial: PageSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppView {
    FrontPage,
    Profile,
    Contact,
}

pub struct SiteApp {
    runtime: Arc<Runtime>,
    ctx: Arc<SiteContext>,
    refresher: Option<RefresherHandle>,
    updates: mpsc::Receiver<PageEvent>,
    snapshot: PageSnapshot,
    current_view: AppView,
    side_stories: CarouselDriver<Story>,
    side_input: CarouselInput,
    testimonials: CarouselDriver<Testimonial>,
    testimonial_input: CarouselInput,
    portraits: CarouselDriver<ProfileImage>,
    portrait_input: CarouselInput,
    clicks: broadcast::Receiver<StoryClicked>,
    opened_story: Option<Story>,
    gallery: Vec<GalleryItem>,
    gallery_filter: GalleryFilter,
    router: ProfileRouter,
    location: String,
    contact: Vec<FieldSpec>,
    contact_errors: Vec<FieldError>,
    contact_sent: bool,
}

/// Picks the English or Telugu variant of a UI label.
fn tr(language: &Language, en: &'static str, te: &'static str) -> &'static str {
    if *language == Language::TELUGU {
        te
    } else {
        en
    }
}

fn text_at<'a>(doc: Option<&'a Value>, path: &[&str]) -> Option<&'a str> {
    let mut node = doc?;
    for key in path {
        node = node.get(key)?;
    }
    node.as_str()
}

/// `(title, description)` of every entry in the list under `key`.
fn list_entries(doc: &Value, key: &str) -> Vec<(String, String)> {
    let Some(items) = doc.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            let field = |name: &str| item.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
            (field("title"), field("description"))
        })
        .filter(|(title, _)| !title.is_empty())
        .collect()
}

fn section_for(name: &str) -> Option<Section> {
    serde_json::from_value(Value::String(name.to_string())).ok()
}

fn contact_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("name", FieldKind::Text, true),
        FieldSpec::new("email", FieldKind::Email, true),
        FieldSpec::new("phone", FieldKind::Tel, false),
        FieldSpec::new("message", FieldKind::Text, true),
    ]
}

impl SiteApp {
    pub fn new(init: AppInit) -> Self {
        let carousels = init.ctx.config.carousels.clone();
        let side_stories = CarouselDriver::new(carousels.side_stories, init.ctx.signals.story_clicked.clone());
        let testimonials = CarouselDriver::new(carousels.testimonials, Signal::new("testimonial_clicked"));
        let portraits = CarouselDriver::new(carousels.profile_images, Signal::new("profile_image_clicked"));
        let clicks = init.ctx.signals.story_clicked.subscribe();

        let mut router = ProfileRouter::new(PROFILE_SECTIONS);
        let location = router.on_hash_change("").hash;

        let mut app = Self {
            runtime: init.runtime,
            ctx: init.ctx,
            refresher: Some(init.refresher),
            updates: init.updates,
            snapshot: init.initial.clone(),
            current_view: AppView::FrontPage,
            side_stories,
            side_input: CarouselInput::default(),
            testimonials,
            testimonial_input: CarouselInput::default(),
            portraits,
            portrait_input: CarouselInput::default(),
            clicks,
            opened_story: None,
            gallery: Vec::new(),
            gallery_filter: GalleryFilter::default(),
            router,
            location,
            contact: contact_fields(),
            contact_errors: Vec::new(),
            contact_sent: false,
        };
        app.apply_snapshot(init.initial);
        app
    }

    fn apply_snapshot(&mut self, snapshot: PageSnapshot) {
        let testimonials = snapshot
            .content
            .get(Section::Testimonials)
            .map(Testimonial::from_section)
            .unwrap_or_default();
        let portraits = snapshot
            .content
            .get(Section::Main)
            .map(ProfileImage::from_main)
            .unwrap_or_default();
        self.gallery = snapshot
            .content
            .get(Section::Gallery)
            .map(GalleryItem::from_section)
            .unwrap_or_default();

        let runtime = self.runtime.clone();
        runtime.block_on(async {
            self.side_stories.refresh(snapshot.side_stories.clone()).await;
            self.testimonials.refresh(testimonials).await;
            self.portraits.refresh(portraits).await;
        });

        // revalidate so messages follow the language
        if !self.contact_errors.is_empty() {
            self.contact_errors = validate_form(&self.contact, &snapshot.language);
        }
        self.snapshot = snapshot;
    }

    fn refresh_updates(&mut self) {
        while let Ok(PageEvent::Refreshed(snapshot)) = self.updates.try_recv() {
            info!(language = %snapshot.language, "page snapshot received");
            self.apply_snapshot(*snapshot);
        }
        loop {
            match self.clicks.try_recv() {
                Ok(selection) => self.opened_story = Some(selection.item),
                Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "story clicks dropped"),
                Err(_) => break,
            }
        }
    }

    fn language(&self) -> Language {
        self.snapshot.language.clone()
    }

    fn setup_theme(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        let paper = Color32::from_rgb(250, 247, 240);
        let panel = Color32::from_rgb(242, 237, 226);
        let ink = Color32::from_rgb(34, 34, 34);
        let rule = Color32::from_rgb(200, 190, 170);
        let accent = Color32::from_rgb(176, 32, 38);

        style.visuals.dark_mode = false;
        style.visuals.panel_fill = panel;
        style.visuals.window_fill = paper;
        style.visuals.extreme_bg_color = Color32::WHITE;
        style.visuals.faint_bg_color = paper;
        style.visuals.override_text_color = Some(ink);

        style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, rule);
        style.visuals.widgets.inactive.bg_fill = paper;
        style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, accent);
        style.visuals.widgets.active.bg_fill = accent;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
        style.visuals.selection.bg_fill = Color32::from_rgba_unmultiplied(176, 32, 38, 50);
        style.visuals.selection.stroke = Stroke::new(1.0, accent);

        style.visuals.widgets.noninteractive.rounding = Rounding::same(2.0);
        style.visuals.widgets.inactive.rounding = Rounding::same(2.0);
        style.visuals.widgets.hovered.rounding = Rounding::same(2.0);
        style.visuals.widgets.active.rounding = Rounding::same(2.0);

        style.spacing.item_spacing = egui::vec2(10.0, 8.0);
        style.spacing.button_padding = egui::vec2(10.0, 5.0);

        ctx.set_style(style);
    }

    fn draw_masthead(&mut self, ctx: &egui::Context) {
        let language = self.language();
        egui::TopBottomPanel::top("masthead").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let main = self.snapshot.content.get(Section::Main);
                let name = text_at(main, &["site", "newspaper_name"])
                    .or_else(|| text_at(main, &["site", "title"]))
                    .unwrap_or("Profile");
                ui.heading(egui::RichText::new(name).strong().size(22.0));
                if let Some(tagline) = text_at(main, &["site", "tagline"]) {
                    ui.label(egui::RichText::new(tagline).italics());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let other = language.toggled();
                    let toggle_label = tr(&other, "English", "తెలుగు");
                    if ui
                        .button(toggle_label)
                        .on_hover_text(format!("lang={}", language.html_lang()))
                        .clicked()
                    {
                        let now = self.runtime.block_on(self.ctx.language.toggle());
                        info!(language = %now, "language toggled from the masthead");
                    }
                    ui.separator();
                    ui.selectable_value(&mut self.current_view, AppView::Contact, tr(&language, "Contact", "సంప్రదించండి"));
                    ui.selectable_value(&mut self.current_view, AppView::Profile, tr(&language, "Profile", "ప్రొఫైల్"));
                    ui.selectable_value(&mut self.current_view, AppView::FrontPage, tr(&language, "Front page", "ముఖపత్రం"));
                });
            });

            let ticker = self
                .snapshot
                .news
                .as_ref()
                .and_then(|desk| desk.ticker_text(&language))
                .or_else(|| text_at(self.snapshot.content.get(Section::Main), &["hero", "ticker"]).map(str::to_string));
            if let Some(ticker) = ticker {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(tr(&language, "LATEST", "తాజా")).strong().color(Color32::from_rgb(176, 32, 38)));
                    ui.label(ticker);
                });
            }
            ui.add_space(4.0);
        });
    }

    fn draw_front_page(&mut self, ui: &mut egui::Ui) {
        let language = self.language();
        let today = Utc::now().date_naive();

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            self.draw_hero(ui, &language);
            ui.separator();

            ui.label(egui::RichText::new(tr(&language, "Side stories", "ఇతర కథనాలు")).strong().size(16.0));
            carousel(
                ui,
                &self.runtime,
                &mut self.side_stories,
                &mut self.side_input,
                "side-stories",
                |ui, story: &Story, current| {
                    let response = egui::Frame::group(ui.style())
                        .show(ui, |ui| {
                            ui.set_width(220.0);
                            ui.set_min_height(110.0);
                            let headline = egui::RichText::new(&story.headline).size(15.0);
                            ui.label(if current { headline.strong() } else { headline });
                            if !story.category.is_empty() {
                                ui.small(story.category.to_uppercase());
                            }
                            ui.add(egui::Label::new(&story.summary).wrap(true));
                            if !story.date.is_empty() {
                                ui.weak(relative_label_for(&story.date, today));
                            }
                        })
                        .response;
                    response.interact(egui::Sense::click())
                },
            );

            if let Some(desk) = &self.snapshot.news {
                let regular = desk.categories().regular_stories(10);
                if !regular.is_empty() {
                    ui.separator();
                    ui.label(egui::RichText::new(tr(&language, "News", "వార్తలు")).strong().size(16.0));
                    for story in regular {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(egui::RichText::new(story.title_for(&language)).strong());
                            if let Some(caption) = story.published_caption(&language) {
                                ui.weak(caption);
                            }
                        });
                        ui.add(egui::Label::new(story.summary_for(&language)).wrap(true));
                    }
                }
            }

            for section in [Section::Initiatives, Section::Events, Section::Campaigns] {
                self.draw_section_summary(ui, section);
            }

            ui.separator();
            self.draw_testimonials(ui, &language);
            ui.separator();
            self.draw_gallery(ui, &language);
        });
    }

    fn draw_hero(&self, ui: &mut egui::Ui, language: &Language) {
        let main = self.snapshot.content.get(Section::Main);
        let exclusive = self
            .snapshot
            .news
            .as_ref()
            .and_then(|desk| desk.categories().latest_exclusive());

        if let Some(banner) = text_at(main, &["hero", "breaking_banner"]) {
            ui.label(egui::RichText::new(banner).strong().color(Color32::from_rgb(176, 32, 38)));
        }
        match exclusive {
            Some(story) => {
                ui.label(egui::RichText::new(story.title_for(language)).strong().size(24.0));
                if let Some(caption) = story.published_caption(language) {
                    ui.weak(caption);
                }
                ui.add(egui::Label::new(story.summary_for(language)).wrap(true));
            }
            None => {
                if let Some(headline) = text_at(main, &["hero", "main_headline"]) {
                    ui.label(egui::RichText::new(headline).strong().size(24.0));
                }
                if let Some(lead) = text_at(main, &["hero", "lead_story"]) {
                    ui.add(egui::Label::new(lead).wrap(true));
                }
            }
        }
    }

    fn draw_section_summary(&self, ui: &mut egui::Ui, section: Section) {
        let Some(doc) = self.snapshot.content.get(section) else {
            return;
        };
        ui.separator();
        if let Some((category, title)) = self.snapshot.content.header(section) {
            ui.small(category.to_uppercase());
            ui.label(egui::RichText::new(title).strong().size(16.0));
        }
        for (title, description) in list_entries(doc, section.file_stem()) {
            ui.label(egui::RichText::new(title).strong());
            if !description.is_empty() {
                ui.add(egui::Label::new(description).wrap(true));
            }
        }
    }

    fn draw_testimonials(&mut self, ui: &mut egui::Ui, language: &Language) {
        let heading = self
            .snapshot
            .content
            .header(Section::Testimonials)
            .map(|(_, title)| title.to_string())
            .unwrap_or_else(|| tr(language, "Testimonials", "అభిప్రాయాలు").to_string());
        ui.label(egui::RichText::new(heading).strong().size(16.0));
        carousel(
            ui,
            &self.runtime,
            &mut self.testimonials,
            &mut self.testimonial_input,
            "testimonials",
            |ui, card: &Testimonial, _current| {
                egui::Frame::group(ui.style())
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width().min(560.0));
                        ui.add(egui::Label::new(egui::RichText::new(card.quoted()).italics()).wrap(true));
                        ui.label(egui::RichText::new(&card.author.name).strong());
                        if !card.author.title.is_empty() {
                            ui.weak(&card.author.title);
                        }
                    })
                    .response
            },
        );
    }

    fn draw_gallery(&mut self, ui: &mut egui::Ui, language: &Language) {
        if self.gallery.is_empty() {
            return;
        }
        ui.label(egui::RichText::new(tr(language, "Gallery", "గ్యాలరీ")).strong().size(16.0));
        ui.horizontal_wrapped(|ui| {
            for button in GalleryFilter::buttons(&self.gallery) {
                let active = self.gallery_filter.active() == button;
                if ui.selectable_label(active, button.as_str()).clicked() {
                    self.gallery_filter.select(&button);
                }
            }
        });
        ui.horizontal_wrapped(|ui| {
            for item in self.gallery_filter.visible(&self.gallery) {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(160.0);
                    ui.label(egui::RichText::new(&item.title).strong());
                    ui.small(&item.category);
                    if let Some(url) = &item.image_url {
                        ui.weak(url);
                    }
                });
            }
        });
    }

    fn draw_profile(&mut self, ctx: &egui::Context) {
        let language = self.language();
        egui::SidePanel::left("profile_sidebar")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                let sections: Vec<String> = self.router.sections().to_vec();
                for section in sections {
                    let active = self.router.active() == section;
                    if ui.selectable_label(active, section.replace('-', " ")).clicked() {
                        self.location = self.router.switch_to(&section).hash;
                    }
                }
                ui.separator();
                ui.small(tr(&language, "Location", "చిరునామా"));
                let response = ui.text_edit_singleline(&mut self.location);
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.location = self.router.on_hash_change(&self.location).hash;
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                let active = self.router.active().to_string();
                match section_for(&active) {
                    Some(Section::Gallery) => self.draw_gallery(ui, &language),
                    Some(Section::Testimonials) => self.draw_testimonials(ui, &language),
                    Some(section) => self.draw_section_summary(ui, section),
                    None => self.draw_overview(ui, &active),
                }
            });
        });
    }

    /// Overview and biography both come from the `about` block of `main`.
    fn draw_overview(&mut self, ui: &mut egui::Ui, active: &str) {
        let Some(about) = self.snapshot.content.get(Section::Main).and_then(|main| main.get("about")).cloned() else {
            ui.weak("…");
            return;
        };
        if let Some(title) = about.get("section_title").and_then(Value::as_str) {
            ui.label(egui::RichText::new(title).strong().size(18.0));
        }
        if !self.portraits.view().slides.is_empty() {
            carousel(
                ui,
                &self.runtime,
                &mut self.portraits,
                &mut self.portrait_input,
                "portraits",
                |ui, image: &ProfileImage, _current| {
                    egui::Frame::group(ui.style())
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width().min(420.0));
                            let caption = if image.caption.is_empty() { &image.url } else { &image.caption };
                            ui.label(egui::RichText::new(caption).strong());
                            ui.weak(&image.url);
                        })
                        .response
                },
            );
        }
        if let Some(quote) = about.get("quote").and_then(Value::as_str) {
            ui.label(egui::RichText::new(format!("\"{quote}\"")).italics());
        }
        if active == "biography" {
            let paragraphs = about.get("biography").and_then(Value::as_array).into_iter().flatten();
            for paragraph in paragraphs.filter_map(Value::as_str) {
                ui.add(egui::Label::new(paragraph).wrap(true));
            }
        }
        if let Some(stats) = about.get("stats").and_then(Value::as_array) {
            ui.horizontal_wrapped(|ui| {
                for stat in stats {
                    let number = stat.get("number").and_then(Value::as_str).unwrap_or_default();
                    let label = stat.get("label").and_then(Value::as_str).unwrap_or_default();
                    ui.group(|ui| {
                        ui.label(egui::RichText::new(number).strong().size(18.0));
                        ui.small(label);
                    });
                }
            });
        }
    }

    fn draw_contact(&mut self, ui: &mut egui::Ui) {
        let language = self.language();
        if let Some((_, title)) = self.snapshot.content.header(Section::Contact) {
            ui.label(egui::RichText::new(title).strong().size(18.0));
        }
        for field in self.contact.iter_mut() {
            ui.label(&field.name);
            if field.name == "message" {
                ui.text_edit_multiline(&mut field.value);
            } else {
                ui.text_edit_singleline(&mut field.value);
            }
            if let Some(err) = self.contact_errors.iter().find(|err| err.field == field.name) {
                ui.colored_label(Color32::from_rgb(176, 32, 38), &err.message);
            }
        }
        ui.add_space(6.0);
        if ui.button(tr(&language, "Send", "పంపండి")).clicked() {
            self.contact_errors = validate_form(&self.contact, &language);
            self.contact_sent = self.contact_errors.is_empty();
            if self.contact_sent {
                info!("contact form accepted");
                self.contact = contact_fields();
            }
        }
        if self.contact_sent {
            ui.label(tr(&language, "Thank you for your message.", "మీ సందేశానికి ధన్యవాదాలు."));
        }
    }

    fn draw_story_window(&mut self, ctx: &egui::Context) {
        let Some(story) = self.opened_story.clone() else {
            return;
        };
        let mut open = true;
        egui::Window::new(&story.headline)
            .open(&mut open)
            .collapsible(false)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.small(&story.category);
                ui.add(egui::Label::new(&story.summary).wrap(true));
                if !story.date.is_empty() {
                    ui.weak(relative_label_for(&story.date, Utc::now().date_naive()));
                }
            });
        if !open {
            self.opened_story = None;
        }
    }
}

impl Drop for SiteApp {
    fn drop(&mut self) {
        let runtime = self.runtime.clone();
        runtime.block_on(async {
            self.side_stories.destroy().await;
            self.testimonials.destroy().await;
            self.portraits.destroy().await;
        });
        if let Some(handle) = self.refresher.take() {
            if let Err(err) = runtime.block_on(handle.stop()) {
                warn!(error = %err, "page refresher did not stop cleanly");
            }
        }
    }
}

impl eframe::App for SiteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.setup_theme(ctx);
        self.refresh_updates();

        self.draw_masthead(ctx);
        match self.current_view {
            AppView::FrontPage => {
                egui::CentralPanel::default().show(ctx, |ui| self.draw_front_page(ui));
            }
            AppView::Profile => self.draw_profile(ctx),
            AppView::Contact => {
                egui::CentralPanel::default().show(ctx, |ui| self.draw_contact(ui));
            }
        }
        self.draw_story_window(ctx);

        let runtime = self.runtime.clone();
        self.side_input.end_frame(&runtime, &mut self.side_stories);
        self.testimonial_input.end_frame(&runtime, &mut self.testimonials);
        self.portrait_input.end_frame(&runtime, &mut self.portraits);

        // auto-play advances off the UI thread
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
