// src/lib.rs

#[macro_use]
pub mod macros;

pub mod api;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod export;
pub mod file;
pub mod gui;
pub mod log;
pub mod normalize;
pub mod progress;
pub mod request;
pub mod workbook;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{ExportError, FetchError, NormalizeError, RequestError};
pub use export::{ExportArtifact, ExportFormat};
pub use normalize::{FieldData, JsonShape, NormalizedField, NormalizedTable, normalize};
pub use request::{FetchRequest, Target};
