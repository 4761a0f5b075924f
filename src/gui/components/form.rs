// src/gui/components/form.rs
//
// Left panel: credentials, target, fields, fetch button and help.

use eframe::egui::{self, widgets::Spinner};

use crate::{config::consts::KNOWN_FIELDS, core::sanitize::title_case, gui::{actions, app::App}};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Fetch user data");
    ui.add_space(6.0);

    {
        let gui = &mut app.state.gui;
        let form = &mut gui.form;

        ui.label("Access token:");
        let hint = if gui.session.token().is_some() { "(using remembered token)" } else { "" };
        ui.add(egui::TextEdit::singleline(&mut form.token).password(true).hint_text(hint));

        let before = gui.session.remember;
        ui.checkbox(&mut gui.session.remember, "Remember token");
        if before && !gui.session.remember {
            gui.session.forget();
            logd!("UI: remembered token cleared");
        }

        ui.separator();

        ui.checkbox(&mut form.all_users, "All users");
        ui.add_enabled_ui(!form.all_users, |ui| {
            ui.horizontal(|ui| {
                ui.label("User ID:");
                ui.add(egui::DragValue::new(&mut form.user_id).range(1..=u64::MAX).speed(1));
            });
        });

        ui.separator();

        ui.label("Data to fetch:");
        for (name, on) in KNOWN_FIELDS.iter().zip(form.known.iter_mut()) {
            ui.checkbox(on, title_case(name));
        }
        ui.label("Extra fields (comma-separated):");
        ui.add(egui::TextEdit::singleline(&mut form.extra_fields).hint_text("posts, albums"));
    }

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let fetch = ui.add_enabled(!app.running, egui::Button::new("Fetch Data"));
        if fetch.clicked() {
            let ctx = ui.ctx().clone();
            actions::start_fetch(app, &ctx);
        }
        if app.running {
            ui.add(Spinner::new());
        }
    });

    if let Some(err) = &app.form_error {
        ui.colored_label(egui::Color32::from_rgb(220, 30, 30), err.as_str());
    }

    ui.add_space(8.0);

    let help = egui::CollapsingHeader::new("How to use")
        .default_open(app.state.gui.show_help)
        .show(ui, |ui| {
            ui.label("1. Paste your access token.");
            ui.label("2. Pick one user by id, or all users.");
            ui.label("3. Tick the data you want; add other field names if needed.");
            ui.label("4. Fetch, then copy or export each section.");
            ui.label("List data becomes a table. Other values export as JSON only.");
        });
    app.state.gui.show_help = help.fully_open();
}
