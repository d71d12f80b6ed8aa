//! Error types for scoremap.
//!
//! A single error enum covers every failure of the plotting pipeline, from
//! input validation through image export.

use thiserror::Error;

/// The main error type for scoremap operations.
#[derive(Error, Debug)]
pub enum ScoremapError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed score tables or plotting inputs
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Group-pair labels do not line up with the source columns
    #[error("Label mismatch: {labels} group-pair labels for {columns} score columns")]
    LabelMismatch { labels: usize, columns: usize },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// Output path has no raster format we can encode
    #[error("Unsupported output format: {path}")]
    UnsupportedFormat { path: String },
}

/// Convenience type alias for Results with ScoremapError
pub type Result<T> = std::result::Result<T, ScoremapError>;
