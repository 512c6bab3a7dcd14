//! Error types for the store crate.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored bytes no longer hash to their content id.
    #[error("blob {id} is corrupted: content hashes to {actual}")]
    Corrupted { id: String, actual: String },

    /// A content id string that is not a raw sha2-256 CIDv1.
    #[error("invalid content id: {0}")]
    InvalidContentId(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Lock could not be taken (poisoned mutex or file lock failure).
    #[error("lock error: {0}")]
    Lock(String),

    /// Blocking task failed to complete.
    #[error("background task failed: {0}")]
    Task(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
