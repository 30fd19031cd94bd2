//! Index error types.

use thiserror::Error;

/// Errors raised while rebuilding or editing revision indexes.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("storage fault during index update: {0}")]
    Fault(#[from] bodega_storage::StorageError),

    #[error("malformed index document at {key}: {reason}")]
    Malformed { key: String, reason: String },
}

/// Result type for index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;
