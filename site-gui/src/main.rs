mod app;
mod widgets;

use std::sync::Arc;

use eframe::{egui, NativeOptions};
use reqwest::{redirect, ClientBuilder};
use site_core::{refresh_page, spawn_page_refresher, SiteConfig, SiteContext};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::{AppInit, SiteApp};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let runtime = Arc::new(Runtime::new()?);
    let config = SiteConfig::load();
    let client = ClientBuilder::new()
        .redirect(redirect::Policy::limited(5))
        .user_agent(config.content.user_agent.clone())
        .build()?;

    let ctx = Arc::new(runtime.block_on(SiteContext::from_config(config, client))?);
    let language = ctx.language.get();
    info!(language = %language, base = %ctx.config.content.base_url, "starting profile site preview");
    let initial = runtime.block_on(refresh_page(&ctx, &language));

    let (update_tx, update_rx) = mpsc::channel(16);
    let refresher = {
        let _guard = runtime.enter();
        spawn_page_refresher(ctx.clone(), update_tx)
    };

    let init = AppInit {
        runtime: runtime.clone(),
        ctx,
        refresher,
        updates: update_rx,
        initial,
    };

    eframe::run_native(
        "Profile Site",
        NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1100.0, 820.0])
                .with_min_inner_size([720.0, 540.0]),
            ..Default::default()
        },
        Box::new(move |cc| {
            install_telugu_fonts(&cc.egui_ctx);
            Box::new(SiteApp::new(init))
        }),
    )?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// The default egui fonts carry no Telugu glyphs; append whatever system
/// font covers the script as a fallback.
fn install_telugu_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    let candidates = [
        "/usr/share/fonts/truetype/noto/NotoSansTelugu-Regular.ttf",
        "/usr/share/fonts/opentype/noto/NotoSansTelugu-Regular.otf",
        "/usr/share/fonts/truetype/lohit-telugu/Lohit-Telugu.ttf",
        "/usr/share/fonts/truetype/fonts-telu-extra/Pothana2000.ttf",
        "/Library/Fonts/Telugu Sangam MN.ttc",
        "C:\\Windows\\Fonts\\gautami.ttf",
    ];

    let mut added: Vec<String> = Vec::new();
    for path in candidates.iter() {
        if let Ok(bytes) = std::fs::read(path) {
            let name = format!("telugu-{}", added.len());
            fonts.font_data.insert(name.clone(), egui::FontData::from_owned(bytes));
            for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                fonts.families.entry(family).or_default().push(name.clone());
            }
            added.push(name);
        }
    }

    if added.is_empty() {
        tracing::warn!("no Telugu font found, Telugu text will not render");
    } else {
        ctx.set_fonts(fonts);
    }
}
