// src/error.rs
//! Error types for each layer. Only `NormalizeError` belongs to the core;
//! the rest are raised by the collaborators around it.

use thiserror::Error;

/// The single hard failure of the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Top-level payload was not a JSON object.
    #[error("invalid payload shape: expected an object, found {found}")]
    InvalidPayloadShape { found: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("please select at least one data type to fetch")]
    NoFields,

    #[error("please enter an access token")]
    MissingToken,

    #[error("invalid target '{0}': expected a user id >= 1 or 'all'")]
    InvalidTarget(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure that survived every retry.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status code: {0}")]
    Status(u16),

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Body decoded but `api_status` was not 200.
    #[error("API returned an error: {message}")]
    Api { message: String },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Scalar fields only export as JSON.
    #[error("field '{field}' cannot be exported as {format}")]
    NotExportable { field: String, format: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),
}
