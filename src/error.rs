//! Error types for annotree operations.

use thiserror::Error;

/// Errors that can occur while loading, rebuilding or exporting annotations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML writing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[cfg(feature = "fetch")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Annotation {0} has no ranges")]
    MissingRanges(String),

    #[error("Invalid cookie entry: {0:?}")]
    InvalidCookies(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
