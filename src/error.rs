//! Error types for zonestat library.

use std::io;
use thiserror::Error;

/// Result type alias for zonestat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while scanning, aggregating or rendering a corpus.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout record is not valid JSON or has the wrong shape.
    #[error("Layout parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal failed (missing root, permission denied, ...).
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown metric name.
    #[error("Unknown metric: {0}")]
    InvalidMetric(String),

    /// Polynomial fit could not be computed.
    #[error("Smoothing error: {0}")]
    Smoothing(String),

    /// Error while drawing an overlay or chart.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error writing the CSV table.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap any displayable drawing backend failure.
    pub(crate) fn render<E: std::fmt::Display>(err: E) -> Self {
        Error::Render(err.to_string())
    }
}
