//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid storage key: {0}")]
    BadKey(String),

    #[error("invalid package coordinate: {0}")]
    BadCoordinate(String),

    #[error("invalid binary hash: {0}")]
    BadHash(String),

    #[error("invalid conaninfo: {0}")]
    InvalidIni(String),

    #[error("invalid revision index: {0}")]
    InvalidIndex(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
