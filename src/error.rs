//! Error types for tracker operations.
//!
//! The engine itself never fails; these cover the vault, configuration and
//! user input around it.

use std::io;

use crate::storage::StorageError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tracker is locked")]
    Locked,

    #[error("no vault found; run setup first")]
    NotSetUp,

    #[error("a vault already exists")]
    AlreadySetUp,

    #[error("wrong passphrase")]
    WrongPassphrase,

    #[error("no passphrase given (use --passphrase or LUNE_PASSPHRASE)")]
    MissingPassphrase,

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("refusing to {0} without --yes")]
    Unconfirmed(String),

    #[error("state lock poisoned")]
    StatePoisoned,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<chrono::ParseError> for Error {
    fn from(e: chrono::ParseError) -> Self {
        Error::InvalidDate(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Error::StatePoisoned
    }
}
