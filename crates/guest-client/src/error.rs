//! Client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The shared guest-list password did not match.
    #[error("Incorrect password. Double-check and try again.")]
    IncorrectPassword,

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The sync endpoint answered with a non-success status.
    #[error("sync endpoint error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The sync endpoint answered 2xx with a body we cannot use.
    #[error("Guest list response invalid: {0}")]
    InvalidResponse(String),

    /// Local durable storage failed.
    #[error("local storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] guest_core::CoreError),
}
