//! Chunk upload handler.

use crate::error::{ApiError, ApiResult};
use crate::metrics::{BYTES_RECEIVED, CHUNKS_RECEIVED};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, State};
use bytes::Bytes;
use splitpack_core::session::SessionId;
use splitpack_core::{UploadChunkResponse, validate_filename};

/// POST /upload-chunk - Store one chunk of a session's upload.
///
/// Multipart fields: `chunk` (bytes), `filename`, `chunkIndex`, `uniqueId`.
/// All four are required and non-empty. The session directory is created on
/// first chunk; re-uploading an index replaces its content.
#[tracing::instrument(skip_all, fields(session, filename, index))]
pub async fn upload_chunk(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadChunkResponse>> {
    let mut chunk: Option<Bytes> = None;
    let mut filename: Option<String> = None;
    let mut chunk_index: Option<String> = None;
    let mut unique_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("chunk") => {
                chunk = Some(field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("failed to read chunk field: {e}"))
                })?);
            }
            Some("filename") => filename = Some(read_text(field, "filename").await?),
            Some("chunkIndex") => chunk_index = Some(read_text(field, "chunkIndex").await?),
            Some("uniqueId") => unique_id = Some(read_text(field, "uniqueId").await?),
            _ => {}
        }
    }

    let chunk = chunk
        .filter(|data| !data.is_empty())
        .ok_or_else(|| ApiError::MissingData("chunk".to_string()))?;
    let filename = filename
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::MissingData("filename".to_string()))?;
    let chunk_index = chunk_index
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::MissingData("chunkIndex".to_string()))?;
    let unique_id = unique_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::MissingData("uniqueId".to_string()))?;

    let session = SessionId::parse(&unique_id)?;
    validate_filename(&filename)?;
    let index: u32 = chunk_index.trim().parse().map_err(|_| {
        ApiError::BadRequest(format!(
            "chunkIndex must be a non-negative integer, got {chunk_index}"
        ))
    })?;

    let max_chunk_size = state.config.server.max_chunk_size;
    if chunk.len() as u64 > max_chunk_size {
        return Err(ApiError::BadRequest(format!(
            "chunk size {} exceeds maximum {}",
            chunk.len(),
            max_chunk_size
        )));
    }

    let span = tracing::Span::current();
    span.record("session", session.as_str());
    span.record("filename", filename.as_str());
    span.record("index", index);

    let size = chunk.len() as u64;
    let _guard = state.sessions.acquire(session.as_str()).await;
    state
        .chunks
        .store_chunk(session.as_str(), &filename, index, chunk)
        .await?;

    CHUNKS_RECEIVED.inc();
    BYTES_RECEIVED.inc_by(size);
    tracing::debug!(size, "Chunk stored");

    Ok(Json(UploadChunkResponse { success: true }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read {name} field: {e}")))
}
