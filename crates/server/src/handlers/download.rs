//! Artifact download handler.

use crate::error::ApiResult;
use crate::metrics::ARTIFACTS_DOWNLOADED;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

/// MIME type for Android packages.
const APK_CONTENT_TYPE: &str = "application/vnd.android.package-archive";

/// GET /download/{filename} - Stream a converted artifact as an attachment.
///
/// Pure passthrough from the artifact store by name; 404 if absent.
#[tracing::instrument(skip(state))]
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let size = state.artifacts.size(&filename).await?;
    let stream = state.artifacts.get_stream(&filename).await?;

    ARTIFACTS_DOWNLOADED.inc();
    tracing::debug!(size, "Serving artifact");

    Ok((
        [
            (CONTENT_TYPE, APK_CONTENT_TYPE.to_string()),
            (CONTENT_LENGTH, size.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
