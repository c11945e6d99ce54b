//! Error types for the firstline library.
//!
//! The title pipeline itself never fails; errors only come from the edges
//! (reading notes, loading and validating settings).

use std::io;
use thiserror::Error;

/// Result type alias for firstline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for firstline library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a note or settings file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Settings JSON could not be parsed.
    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings parsed but hold a value the pipeline cannot honor.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// A custom rule is malformed.
    #[error("Invalid custom rule #{index}: {message}")]
    InvalidRule { index: usize, message: String },
}
