// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use api_downloader::{config::options::AppOptions, gui, log, loge};
use eframe::egui::ViewportBuilder;

fn main() {
    log::init();

    let app_options = AppOptions::load().unwrap_or_else(|e| {
        loge!("Config: {e}; falling back to defaults");
        AppOptions::default()
    });

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("API Data Downloader")
            .with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options, app_options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
