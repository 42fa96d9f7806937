//! Conversion orchestrator: merge, extract, rename, clean up.

use crate::error::{ApiError, ApiResult};
use crate::metrics::{CONVERSIONS_COMPLETED, CONVERSIONS_FAILED, CONVERT_DURATION};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Request, State};
use splitpack_core::session::{ConvertPhase, SessionId};
use splitpack_core::{BASE_APK_SUFFIX, ConvertRequest, ConvertResponse, artifact_name, validate_filename};
use std::time::Instant;

/// Maximum request body size for convert requests (64 KiB).
const MAX_CONVERT_BODY_SIZE: usize = 64 * 1024;

/// Directory inside a session where the matched member is staged before the
/// rename into the artifact store.
const STAGING_DIR: &str = "extracted";

/// POST /convert - Merge a session's chunks and extract the base APK.
///
/// The session's chunk set, merged file, and extraction staging are removed
/// whether the conversion succeeds or fails; only the renamed artifact
/// survives a success. There is no retry: a failed session must be
/// re-uploaded from scratch.
#[tracing::instrument(skip(state, req), fields(session, filename))]
pub async fn convert(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<ConvertResponse>> {
    let start = Instant::now();

    let body: ConvertRequest = {
        let bytes = axum::body::to_bytes(req.into_body(), MAX_CONVERT_BODY_SIZE)
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))?
    };

    let session = SessionId::parse(&body.unique_id)?;
    validate_filename(&body.filename)?;

    let span = tracing::Span::current();
    span.record("session", session.as_str());
    span.record("filename", body.filename.as_str());

    if body.total_chunks.is_none() {
        tracing::warn!(
            "convert without totalChunks - a dropped chunk would silently truncate the merge"
        );
    }

    // Hold the session lock across the whole pipeline so a straggling chunk
    // upload cannot race the merge.
    let _guard = state.sessions.acquire(session.as_str()).await;

    let result = run_conversion(&state, &session, &body).await;

    // The chunk set, merged file, and staging tree never outlive the
    // conversion attempt.
    if let Err(e) = state.chunks.remove_session(session.as_str()).await {
        tracing::warn!(error = %e, "Failed to remove session artifacts");
    }
    state.sessions.release(session.as_str()).await;

    match result {
        Ok(artifact) => {
            CONVERSIONS_COMPLETED.inc();
            CONVERT_DURATION.observe(start.elapsed().as_secs_f64());
            tracing::info!(
                artifact = %artifact,
                phase = ConvertPhase::Done.as_str(),
                "Conversion finished"
            );
            Ok(Json(ConvertResponse {
                success: true,
                download_url: format!("/download/{artifact}"),
            }))
        }
        Err(e) => {
            CONVERSIONS_FAILED.inc();
            tracing::warn!(
                error = %e,
                phase = ConvertPhase::Failed.as_str(),
                "Conversion failed"
            );
            Err(e)
        }
    }
}

/// Run merge → extract → persist. The caller owns cleanup.
async fn run_conversion(
    state: &AppState,
    session: &SessionId,
    req: &ConvertRequest,
) -> ApiResult<String> {
    tracing::debug!(phase = ConvertPhase::Merging.as_str(), "Merging chunks");
    let merged = state
        .chunks
        .reassemble(session.as_str(), &req.filename, req.total_chunks)
        .await?;

    tracing::debug!(
        phase = ConvertPhase::Extracting.as_str(),
        "Extracting archive member"
    );
    let staging = state.chunks.session_dir(session.as_str())?.join(STAGING_DIR);
    let extracted = tokio::task::spawn_blocking(move || {
        splitpack_storage::extract_member(&merged, BASE_APK_SUFFIX, &staging)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "extraction task panicked");
        ApiError::Internal
    })??;

    let artifact = artifact_name(&req.filename);
    state.artifacts.persist(&extracted, &artifact).await?;
    Ok(artifact)
}
