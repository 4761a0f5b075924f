// src/gui/components/data_table.rs
//
// Read-only grid for one normalized table.
// Purely a view; cells render as their CSV text.

use eframe::egui::{self, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::{csv::cell_text, normalize::NormalizedTable};

const ROW_HEIGHT: f32 = 20.0;
const MAX_HEIGHT: f32 = 280.0;

pub fn draw(ui: &mut egui::Ui, table: &NormalizedTable) {
    let cols = table.ncols();

    // Wide tables scroll sideways inside the section.
    egui::ScrollArea::horizontal()
        .id_salt(("table_hscroll", table.field()))
        .show(ui, |ui| {
            let mut builder = TableBuilder::new(ui)
                .id_salt(("table_state", table.field()))
                .striped(true)
                .min_scrolled_height(0.0)
                .max_scroll_height(MAX_HEIGHT);
            for _ in 0..cols {
                builder = builder.column(Column::initial(120.0).at_least(40.0).resizable(true).clip(true));
            }

            builder
                .header(24.0, |mut header| {
                    for name in table.columns() {
                        header.col(|ui| {
                            ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                            ui.add(egui::Label::new(RichText::new(name).strong()).selectable(false));
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.nrows(), |mut row| {
                        let Some(cells) = table.rows().get(row.index()) else { return };
                        for v in cells {
                            row.col(|ui| {
                                ui.style_mut().wrap_mode = Some(TextWrapMode::Truncate);
                                ui.label(cell_text(v));
                            });
                        }
                    });
                });
        });
}
