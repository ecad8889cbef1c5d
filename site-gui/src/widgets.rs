use eframe::egui::{self, Color32, Rect};
use site_core::{CarouselDriver, CarouselView, NavKey};
use tokio::runtime::Runtime;

/// Pointer and viewport state of one carousel between frames, so the
/// driver only hears about transitions.
#[derive(Debug, Default)]
pub struct CarouselInput {
    hovered: bool,
    ratio: Option<f32>,
    drawn: bool,
}

impl CarouselInput {
    /// Closes the frame. A carousel that was not drawn is reported hidden
    /// once and loses its hover, so auto-play stops while another view is up.
    pub fn end_frame<T>(&mut self, runtime: &Runtime, driver: &mut CarouselDriver<T>)
    where
        T: Clone + Send + Sync + 'static,
    {
        let (hide, leave) = self.settle_undrawn();
        if leave {
            runtime.block_on(driver.pointer_leave());
        }
        if hide {
            runtime.block_on(driver.set_visibility(0.0));
        }
    }

    /// Resets the per-frame flag and returns whether an undrawn carousel
    /// still has to be reported hidden and whether it was hovered.
    fn settle_undrawn(&mut self) -> (bool, bool) {
        if std::mem::take(&mut self.drawn) {
            return (false, false);
        }
        let hide = self.ratio.map_or(true, |last| last > 0.0);
        let leave = std::mem::take(&mut self.hovered);
        self.ratio = Some(0.0);
        (hide, leave)
    }
}

/// Share of `rect` inside the visible clip area.
fn visible_ratio(rect: Rect, clip: Rect) -> f32 {
    let area = rect.area();
    if area <= 0.0 {
        return 0.0;
    }
    let overlap = rect.intersect(clip);
    if overlap.is_positive() {
        overlap.area() / area
    } else {
        0.0
    }
}

/// Draws the current window of a carousel and feeds pointer, drag, key and
/// visibility input back into its driver.
pub fn carousel<T, F>(
    ui: &mut egui::Ui,
    runtime: &Runtime,
    driver: &mut CarouselDriver<T>,
    input: &mut CarouselInput,
    id: &str,
    mut draw_item: F,
) where
    T: Clone + Send + Sync + 'static,
    F: FnMut(&mut egui::Ui, &T, bool) -> egui::Response,
{
    let view: CarouselView<T> = driver.view();
    input.drawn = true;

    let frame = egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        if view.is_error() {
            ui.colored_label(Color32::from_rgb(200, 90, 90), "Content could not be loaded.");
            return;
        }
        if view.slides.is_empty() {
            ui.weak("Loading…");
            return;
        }

        ui.horizontal_wrapped(|ui| {
            for slide in &view.slides {
                let response = draw_item(ui, &slide.item, slide.current);
                if response.clicked() {
                    runtime.block_on(driver.click(slide.index));
                }
            }
        });

        ui.horizontal(|ui| {
            if ui.add_enabled(view.prev_enabled, egui::Button::new("◀")).clicked() {
                runtime.block_on(driver.prev());
            }
            for (index, active) in view.dots.iter().enumerate() {
                let dot = if *active { "●" } else { "○" };
                if ui.small_button(dot).clicked() {
                    runtime.block_on(driver.go_to(index));
                }
            }
            if ui.add_enabled(view.next_enabled, egui::Button::new("▶")).clicked() {
                runtime.block_on(driver.next());
            }
        });
    });

    let rect = frame.response.rect;
    let area = ui.interact(rect, ui.id().with(id), egui::Sense::drag());

    let ratio = visible_ratio(rect, ui.clip_rect());
    if input.ratio.map_or(true, |last| (last - ratio).abs() > 0.01) {
        runtime.block_on(driver.set_visibility(ratio));
        input.ratio = Some(ratio);
    }

    let hovered = ui.rect_contains_pointer(rect);
    if hovered != input.hovered {
        if hovered {
            runtime.block_on(driver.pointer_enter());
        } else {
            runtime.block_on(driver.pointer_leave());
        }
        input.hovered = hovered;
    }

    if hovered {
        let (left, right) = ui.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
            )
        });
        if left {
            runtime.block_on(driver.key(NavKey::ArrowLeft));
        }
        if right {
            runtime.block_on(driver.key(NavKey::ArrowRight));
        }
    }

    if let Some(pos) = area.interact_pointer_pos() {
        if area.drag_started() {
            runtime.block_on(driver.touch_start(pos.x, pos.y));
        } else if area.dragged() {
            runtime.block_on(driver.touch_move(pos.x, pos.y));
        }
    }
    if area.drag_released() {
        runtime.block_on(driver.touch_end());
    }
}
