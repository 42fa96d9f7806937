//! Landing page and health check.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::response::Html;
use serde::Serialize;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>APKs to APK converter</title>
    <style>
        body { font-family: sans-serif; margin: 20px; background-color: #f4f4f4; }
        .container { max-width: 600px; margin: auto; background: white; padding: 20px;
                     border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #333; }
        code { background-color: #eee; padding: 0.1em 0.3em; border-radius: 3px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>APKs to APK converter</h1>
        <p>Upload a split-APK bundle in chunks and convert it to a single APK.</p>
        <ul>
            <li><code>POST /upload-chunk</code> — multipart fields <code>chunk</code>,
                <code>filename</code>, <code>chunkIndex</code>, <code>uniqueId</code></li>
            <li><code>POST /convert</code> — JSON <code>{"filename", "uniqueId", "totalChunks"}</code></li>
            <li><code>GET /download/&lt;name&gt;.apk</code> — fetch the converted artifact</li>
        </ul>
        <p>A PDF word-list extractor lives at <a href="/wordlist">/wordlist</a>.</p>
    </div>
</body>
</html>
"#;

/// GET / - Landing page for the converter.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - Health check.
///
/// Intentionally unauthenticated for load balancers and probes. Returns
/// only non-sensitive information.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.chunks.health_check().await?;
    state.artifacts.health_check().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
