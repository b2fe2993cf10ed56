//! Error types for MIME generation.

use std::path::PathBuf;

/// Result type alias for MIME generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME generation error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Attachment source file could not be read.
    #[error("Cannot read attachment '{path}': {source}")]
    FileAccess {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Timestamp outside the representable date range.
    #[error("Timestamp out of range for Date header: {0}")]
    DateOutOfRange(i64),

    /// Missing boundary in multipart message.
    #[error("Missing boundary in multipart message")]
    MissingBoundary,

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
