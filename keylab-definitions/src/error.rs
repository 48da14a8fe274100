//! Error types for the definitions layer.

use thiserror::Error;

/// Result type for definitions operations.
pub type DefinitionsResult<T> = Result<T, DefinitionsError>;

/// Errors that can occur while syncing or fetching definitions.
#[derive(Debug, Error)]
pub enum DefinitionsError {
    /// Network error (request failed, bad status, unreadable body).
    #[error("network error: {0}")]
    Network(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] keylab_store::StoreError),
}
