//! Error types for map rendering.

use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid map extent: {0}")]
    InvalidExtent(String),

    #[error("Invalid figure size {width}x{height}: {message}")]
    InvalidSize {
        width: u32,
        height: u32,
        message: String,
    },

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Coastline error: {0}")]
    Coastline(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Coastline(format!("invalid GeoJSON: {}", err))
    }
}
