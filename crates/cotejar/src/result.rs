//! Result types for Cotejar operations

use thiserror::Error;

/// Result type for Cotejar operations
pub type CotejoResult<T> = Result<T, CotejoError>;

/// Errors that can occur while comparing captures or touching the store
///
/// There are no retries anywhere in this crate: every error propagates
/// synchronously to the caller, which decides whether to retry, skip, or
/// fail the enclosing test. No operation returns a partial result.
#[derive(Debug, Error)]
pub enum CotejoError {
    /// Input bitmap cannot be compared (zero area, mismatched buffer length)
    #[error("Invalid image: {message}")]
    InvalidImage {
        /// Error details
        message: String,
    },

    /// Persistent store read, write, decode, or encode failed
    ///
    /// A baseline that exists but cannot be decoded is a storage error,
    /// never silently treated as "no baseline".
    #[error("Storage error: {message}")]
    Storage {
        /// Error details
        message: String,
    },

    /// Capture collaborator failed to produce a frame
    #[error("Capture error: {message}")]
    Capture {
        /// Error details
        message: String,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
