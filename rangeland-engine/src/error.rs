//! Error types used by the crate.

use thiserror::Error;

/// Engine client error type.
///
/// The engine applies no recovery of its own: transport and server errors
/// are surfaced to the caller unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    /// HTTP transport failure.
    #[error("request to the engine failed")]
    Http(#[from] reqwest::Error),
    /// The engine answered with a non-success status.
    #[error("engine returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },
    /// The engine's response could not be decoded.
    #[error("failed to decode engine response")]
    Decode(#[from] serde_json::Error),
    /// A date string is not in `YYYY-MM-DD` form.
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    /// The engine returned a value of an unexpected shape.
    #[error("unexpected value from the engine: {0}")]
    UnexpectedValue(String),
}
