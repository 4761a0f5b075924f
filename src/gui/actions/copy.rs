// src/gui/actions/copy.rs
use eframe::egui;

use crate::{csv, gui::app::App};

pub fn copy(app: &mut App, ix: usize, ui_ctx: &egui::Context) {
    let txt = {
        let Some(table) = super::field_at(app, ix).and_then(|f| f.table()) else {
            app.status("Nothing to copy");
            logd!("Copy: Clicked, but field #{ix} has no table");
            return;
        };
        if table.ncols() == 0 {
            app.status("Nothing to copy");
            return;
        }
        logf!("Copy: field={}, rows={}, cols={}", table.field(), table.nrows(), table.ncols());
        csv::to_csv_string(table)
    };

    ui_ctx.copy_text(txt);
    app.status("Copied CSV to clipboard");
}
