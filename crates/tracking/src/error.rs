use thiserror::Error;

/// Errors reading derived metrics.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A derived field was read before `capture_event`.
    #[error("no event captured")]
    EventNotCaptured,

    /// The event payload lacks a string entry for the key.
    #[error("event payload has no string field '{0}'")]
    MissingPayloadField(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a persistence sink.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
