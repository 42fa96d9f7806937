//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("invalid chunk index: {0}")]
    InvalidChunkIndex(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
