// src/gui/components/export_bar.rs

use eframe::egui;

use crate::gui::{actions::{self, Action}, app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let mut clicked: Option<Action> = None;
    let have_data = app.outcome.is_some();

    // --- Output field ---
    ui.horizontal(|ui| {
        ui.label("Output:");
        if ui
            .add(egui::TextEdit::singleline(&mut app.state.gui.out_dir_text)
                .font(egui::TextStyle::Monospace))
            .changed()
        {
            logd!("UI: out_dir_text changed → {}", app.state.gui.out_dir_text);
        }
    });

    // --- Whole-payload exports ---
    ui.horizontal(|ui| {
        if ui.add_enabled(have_data, egui::Button::new("Export all data (JSON)")).clicked() {
            clicked = Some(Action::ExportAllJson);
        }
        if ui.add_enabled(have_data, egui::Button::new("Export workbook (Excel)")).clicked() {
            clicked = Some(Action::ExportWorkbook);
        }
    });

    // --- Status ---
    ui.horizontal(|ui| {
        ui.label("Status:");
        ui.label(app.status_text());
    });

    if let Some(action) = clicked {
        let ctx = ui.ctx().clone();
        actions::run(app, action, &ctx);
    }
}
