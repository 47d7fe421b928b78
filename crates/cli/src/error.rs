//! CLI error types.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// `history` needs a SQLite sink to read from.
    #[error("no metrics history: configure [sink] kind = \"sqlite\" with a path")]
    NoHistory,

    /// The metrics database does not exist yet.
    #[error("database not found at {path}. Run 'botmetrics track' first")]
    DatabaseNotFound { path: PathBuf },

    /// The demo handler failed while processing an event.
    #[error("handler failed: {0}")]
    Handler(String),

    /// Configuration is invalid or missing required fields.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An event or message failed validation.
    #[error(transparent)]
    Schema(#[from] schema::Error),

    /// A derived metric could not be read.
    #[error(transparent)]
    Metrics(#[from] tracking::Error),

    /// The metrics sink failed.
    #[error(transparent)]
    Persist(#[from] tracking::PersistError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
