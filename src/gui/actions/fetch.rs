// src/gui/actions/fetch.rs
use std::thread;

use eframe::egui;

use crate::{
    api::{self, FetchOutcome},
    error::FetchError,
    gui::{app::App, progress::GuiProgress},
    request::FetchRequest,
};

/// Validate the form and hand the request to a worker thread.
pub fn start_fetch(app: &mut App, ctx: &egui::Context) {
    if app.running {
        logd!("Fetch: Clicked while a fetch is running");
        return;
    }

    let gui = &app.state.gui;
    // An empty field falls back to the remembered token.
    let token = match gui.form.token.trim() {
        "" => gui.session.token().unwrap_or(""),
        t => t,
    };

    let request = match FetchRequest::new(gui.form.target(), gui.form.selected_fields(), token) {
        Ok(r) => r,
        Err(e) => {
            logd!("Fetch: Rejected: {e}");
            app.form_error = Some(e.to_string());
            return;
        }
    };
    app.form_error = None;
    app.running = true;
    app.status("Fetching data…");

    let opts = app.state.options.client.clone();
    let slot = app.pending.clone();
    let status = app.status.clone();
    let ctx = ctx.clone();

    thread::spawn(move || {
        let mut prog = GuiProgress::new(status);
        let res = api::fetch(&opts, &request, Some(&mut prog));
        if let Ok(mut s) = slot.lock() {
            *s = Some(res);
        }
        ctx.request_repaint();
    });
}

/// Apply a finished fetch on the UI thread.
pub fn finish_fetch(app: &mut App, res: Result<FetchOutcome, FetchError>) {
    match res {
        Ok(outcome) => {
            logf!(
                "Fetch: OK target={} fields={} missing={:?}",
                outcome.request.target(),
                outcome.fields.len(),
                outcome.missing_fields()
            );
            let gui = &mut app.state.gui;
            gui.session.after_fetch(outcome.request.token());
            if !gui.session.remember {
                gui.form.token.clear();
            }

            app.outcome = Some(outcome);
            app.status("Data fetched successfully!");
        }
        Err(e) => {
            loge!("Fetch: Error: {e}");
            app.status(format!("Error: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::state::AppState;
    use serde_json::json;

    fn outcome(token: &str) -> FetchOutcome {
        let request = FetchRequest::new(crate::request::Target::User(3), ["followers"], token).unwrap();
        let payload = json!({"api_status": 200, "followers": [{"id": 1}]});
        let fields = crate::normalize::normalize(&payload, request.fields()).unwrap();
        FetchOutcome { request, payload, fields }
    }

    #[test]
    fn remembered_token_survives_fetch() {
        let mut app = App::new(AppState::default());
        app.state.gui.session.remember = true;
        app.state.gui.form.token = s!("secret");

        finish_fetch(&mut app, Ok(outcome("secret")));

        assert_eq!(app.state.gui.session.token(), Some("secret"));
        assert_eq!(app.state.gui.form.token, "secret");
        assert_eq!(app.status_text(), "Data fetched successfully!");
    }

    #[test]
    fn token_dropped_without_remember() {
        let mut app = App::new(AppState::default());
        app.state.gui.form.token = s!("secret");

        finish_fetch(&mut app, Ok(outcome("secret")));

        assert_eq!(app.state.gui.session.token(), None);
        assert!(app.state.gui.form.token.is_empty());
        assert!(app.outcome.is_some());
    }

    #[test]
    fn error_goes_to_status() {
        let mut app = App::new(AppState::default());
        finish_fetch(&mut app, Err(FetchError::Api { message: s!("bad token") }));
        assert!(app.outcome.is_none());
        assert!(app.status_text().contains("bad token"));
    }
}
