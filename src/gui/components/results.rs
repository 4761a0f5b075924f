// src/gui/components/results.rs
//
// One section per requested field, in request order.

use eframe::egui::{self, RichText};

use crate::{
    core::sanitize::title_case,
    export::ExportFormat,
    gui::{actions::{self, Action}, app::App},
    normalize::FieldData,
};

use super::data_table;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(outcome) = app.outcome.as_ref() else {
        ui.label("No data yet. Fill in the form and press Fetch Data.");
        return;
    };

    let mut clicked: Option<Action> = None;

    egui::ScrollArea::vertical()
        .id_salt("results_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for name in outcome.request.fields() {
                let title = title_case(name);
                ui.heading(&title);

                let found = outcome.fields.iter().position(|f| f.name == *name);
                let Some(ix) = found else {
                    ui.label("No data available");
                    ui.separator();
                    continue;
                };
                let field = &outcome.fields[ix];

                match &field.data {
                    FieldData::Table(t) if t.is_empty() => {
                        ui.label(format!("No {} data available", title.to_lowercase()));
                    }
                    FieldData::Table(t) => {
                        ui.label(format!("{} rows × {} columns", t.nrows(), t.ncols()));
                        ui.push_id(("section", ix), |ui| data_table::draw(ui, t));
                    }
                    FieldData::Scalar(v) => {
                        let text = serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
                        ui.label(RichText::new(text).monospace());
                    }
                }

                ui.horizontal(|ui| {
                    if field.table().is_some() && ui.button("Copy CSV").clicked() {
                        clicked = Some(Action::CopyCsv(ix));
                    }
                    for format in ExportFormat::offered_for(&field.data) {
                        if ui.button(format!("Export {}", format.label())).clicked() {
                            clicked = Some(Action::ExportField(ix, *format));
                        }
                    }
                });
                ui.separator();
            }
        });

    // Run after the borrow of the outcome ends.
    if let Some(action) = clicked {
        let ctx = ui.ctx().clone();
        actions::run(app, action, &ctx);
    }
}
