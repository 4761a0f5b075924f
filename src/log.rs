// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::consts::{LOG_ENV, LOG_FILE};

// Re-exported so the log macros resolve from any module.
pub use tracing;

/// Install the file logger (`.store/debug.log`).
///
/// Filter comes from `USERDATA_LOG`, falling back to `info`.
/// Calling this twice is harmless; the second call is ignored.
pub fn init() {
    init_at(Path::new(LOG_FILE));
}

pub fn init_at(path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = fs::create_dir_all(parent);
        }
    }

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Logging disabled: cannot open {}: {e}", path.display());
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
