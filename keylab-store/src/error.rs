//! Error types for the device store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write rejected: the configured capacity budget would be exceeded.
    #[error("store capacity exceeded: {needed} bytes needed, {available} available")]
    CapacityExceeded { needed: u64, available: u64 },
}
