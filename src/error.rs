//! Error types for Attika.

use thiserror::Error;

/// Common error type for Attika operations.
#[derive(Error, Debug)]
pub enum AttikaError {
    /// Bad or missing file name (empty original name, or a stored name
    /// that is not a bare file name).
    #[error("invalid file name: {0}")]
    InvalidName(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Disk write failed because the storage volume is full.
    #[error("insufficient storage: {0}")]
    InsufficientStorage(String),

    /// Content gate rejected the detected MIME type.
    #[error("unsupported content type: {detected}")]
    UnsupportedContentType {
        /// The MIME type detected from the stored bytes.
        detected: String,
    },

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Validation error for user input or configuration.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for Attika operations.
pub type Result<T> = std::result::Result<T, AttikaError>;
