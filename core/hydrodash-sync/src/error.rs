//! Error types for the dashboard client.

use hydrodash_types::FieldErrors;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur talking to the listing API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with an error status. `field_errors` carries the
    /// per-field messages of a failed validation.
    #[error("server returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        field_errors: Option<FieldErrors>,
    },

    /// The driver task has stopped.
    #[error("channel closed")]
    ChannelClosed,
}
