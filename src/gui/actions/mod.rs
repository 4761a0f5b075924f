// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Components record what was clicked as an `Action`; it runs after their
// borrow of the outcome ends.

mod copy;    // src/gui/actions/copy.rs
mod export;  // src/gui/actions/export.rs
mod fetch;   // src/gui/actions/fetch.rs

pub use copy::copy;
pub use export::{export_all_json, export_field, export_workbook};
pub use fetch::{finish_fetch, start_fetch};

use eframe::egui;

use crate::{export::ExportFormat, gui::app::App, normalize::NormalizedField};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Index into the outcome's fields.
    CopyCsv(usize),
    ExportField(usize, ExportFormat),
    ExportAllJson,
    ExportWorkbook,
}

pub fn run(app: &mut App, action: Action, ctx: &egui::Context) {
    logd!("UI: action {:?}", action);
    match action {
        Action::CopyCsv(ix) => copy(app, ix, ctx),
        Action::ExportField(ix, format) => export_field(app, ix, format),
        Action::ExportAllJson => export_all_json(app),
        Action::ExportWorkbook => export_workbook(app),
    }
}

#[inline]
pub(super) fn field_at(app: &App, ix: usize) -> Option<&NormalizedField> {
    app.outcome.as_ref().and_then(|o| o.fields.get(ix))
}
