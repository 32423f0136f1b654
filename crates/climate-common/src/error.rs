//! Error types for climate dataset operations.

use thiserror::Error;

/// Result type alias using ClimateError.
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Primary error type for dataset access, reduction and slicing.
#[derive(Debug, Error)]
pub enum ClimateError {
    // === Dataset Errors ===
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Time index {index} out of range for time dimension of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid shape for '{name}': {message}")]
    InvalidShape { name: String, message: String },

    #[error("Failed to read data: {0}")]
    DataReadError(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClimateError {
    /// Shorthand for a [`ClimateError::MissingField`] naming what was absent.
    pub fn missing(what: impl Into<String>) -> Self {
        ClimateError::MissingField(what.into())
    }
}
