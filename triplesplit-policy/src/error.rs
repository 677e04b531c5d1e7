//! Policy error types

use thiserror::Error;

/// Policy-related errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// Bitmap string is empty or contains characters other than `0`/`1`
    #[error("Invalid attribute bitmap '{bitmap}': {message}")]
    InvalidBitmap { bitmap: String, message: String },

    /// Too many granted attributes to enumerate every subset
    #[error("Cannot enumerate subsets of {count} attributes (limit {limit})")]
    TooManyAttributes { count: usize, limit: usize },

    /// Two bitmaps of different widths were compared
    #[error("Bitmap width mismatch: expected {expected}, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },
}

impl PolicyError {
    /// Create an invalid bitmap error
    pub fn invalid_bitmap(bitmap: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidBitmap {
            bitmap: bitmap.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for policy operations
pub type Result<T> = std::result::Result<T, PolicyError>;
