//! Error types shared by the store, configuration and date parsing.

use std::path::PathBuf;

/// A birthday date argument that is not `M/D`, `MM/D`, `M/DD` or `MM/DD`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected MM/DD with month 1-12 and day 1-31, got `{0}`")]
pub struct DateFormatError(pub String);

/// Failure of the persistence layer behind the birthday store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed birthday file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize birthdays: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid birthday for user {user_id} in server {server_id}: {reason}")]
    InvalidRecord {
        user_id: String,
        server_id: String,
        reason: String,
    },

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Invalid or missing bot configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("'{0}' was not found")]
    Missing(&'static str),

    #[error("invalid value for '{key}': {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
