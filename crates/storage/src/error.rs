//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("missing chunk at index {index}")]
    MissingChunk { index: u32 },

    #[error("not a valid zip archive: {0}")]
    InvalidArchive(String),

    #[error("no archive member matching `{0}`")]
    MemberNotFound(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
