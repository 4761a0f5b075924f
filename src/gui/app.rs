// src/gui/app.rs
use std::{
    error::Error,
    sync::{Arc, Mutex},
    time::Duration,
};

use eframe::egui;

use crate::{
    api::FetchOutcome,
    config::{options::AppOptions, state::AppState},
    error::FetchError,
};

use super::{actions, components};

/// Result slot the fetch worker fills; the UI thread drains it each frame.
pub type FetchSlot = Arc<Mutex<Option<Result<FetchOutcome, FetchError>>>>;

pub fn run(native: eframe::NativeOptions, options: AppOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "API Data Downloader",
        native,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::new(options))))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // last successful fetch, rendered by components::results
    pub outcome: Option<FetchOutcome>,
    // validation message under the form
    pub form_error: Option<String>,

    // status/progress (workers write here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,
    pub pending: FetchSlot,
}

impl App {
    pub fn new(state: AppState) -> Self {
        logf!("Init: api_url={} out_dir={}",
            state.options.client.api_url,
            state.options.export.out_dir().display()
        );
        Self {
            state,
            outcome: None,
            form_error: None,
            status: Arc::new(Mutex::new(s!("Idle"))),
            running: false,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    #[inline]
    pub fn status<S: Into<String>>(&self, msg: S) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Take a finished fetch out of the worker slot, if any.
    fn poll_fetch(&mut self) {
        if !self.running {
            return;
        }
        let done = match self.pending.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(res) = done {
            self.running = false;
            actions::finish_fetch(self, res);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetch();

        egui::SidePanel::left("request_form")
            .resizable(false)
            .min_width(260.0)
            .show(ctx, |ui| {
                components::form::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            components::export_bar::draw(ui, self);

            ui.separator();

            components::results::draw(ui, self);
        });

        if self.running {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
