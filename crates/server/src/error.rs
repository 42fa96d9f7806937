//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use splitpack_storage::StorageError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`; mirrors the `success` flag of 2xx responses.
    pub success: bool,
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub error: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing required field: {0}")]
    MissingData(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("incomplete upload: chunk {index} was never received")]
    IncompleteUpload { index: u32 },

    #[error("not a valid zip archive: {0}")]
    ArchiveFormat(String),

    #[error("expected archive member not found: {0}")]
    MemberNotFound(String),

    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingData(_) => "missing_data",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::IncompleteUpload { .. } => "incomplete_upload",
            Self::ArchiveFormat(_) => "archive_format",
            Self::MemberNotFound(_) => "member_not_found",
            Self::Internal => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingData(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::IncompleteUpload { .. } => StatusCode::BAD_REQUEST,
            Self::ArchiveFormat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MemberNotFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => Self::NotFound(what),
            StorageError::MissingChunk { index } => Self::IncompleteUpload { index },
            StorageError::InvalidArchive(msg) => Self::ArchiveFormat(msg),
            StorageError::MemberNotFound(suffix) => Self::MemberNotFound(suffix),
            StorageError::InvalidKey(msg) => Self::BadRequest(msg),
            // I/O details stay in the logs; clients get a generic message.
            StorageError::Io(e) => {
                tracing::error!(error = %e, "storage I/O failure");
                Self::Internal
            }
        }
    }
}

impl From<splitpack_core::Error> for ApiError {
    fn from(err: splitpack_core::Error) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            success: false,
            code: self.code().to_string(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
