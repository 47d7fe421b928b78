//! Validation error types.

use thiserror::Error;

/// Raised when a message, event, or payload fails validation.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A button message was built without any choices.
    #[error("button message requires at least one choice")]
    EmptyChoices,

    /// A message type tag outside the closed set.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// A direction outside the closed set.
    #[error("unknown direction: {0}")]
    UnknownDirection(String),

    /// Missing, mistyped, or mismatched fields in a JSON document.
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
