//! Core error types for questlog-core.
//!
//! One hierarchy built on thiserror: expected, user-facing conditions
//! (`TaskNotFound`, `InvalidState`, `TimerBusy`) sit next to infrastructure
//! failures (`Store`, `Config`). Reward generation failures never appear here
//! -- the reward engine absorbs them and falls back to a default reward.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for questlog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Task id unknown for this user.
    #[error("task '{id}' not found")]
    TaskNotFound { id: String },

    /// Operation illegal for the task's current state
    /// (e.g. starting the timer of a completed task).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Another task's timer is already running. One timer at a time.
    #[error("another quest's timer is active (task '{active}')")]
    TimerBusy { active: String },

    /// Backing store failed; the attempted mutation was not applied.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid field value rejected at the boundary.
    #[error("invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Store-specific errors. Maps onto the `StoreUnavailable` condition:
/// callers must not optimistically apply local state when they see one.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database file.
    #[error("failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another writer.
    #[error("database is locked")]
    Locked,

    /// A stored row could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration.
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration.
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration.
    #[error("failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
