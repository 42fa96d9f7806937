//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use splitpack_core::AppConfig;
use splitpack_server::{AppState, create_router};
use splitpack_storage::{ArtifactStore, ChunkStore};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// A test server wrapper with all dependencies on temporary storage.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with default configuration.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server, letting the caller adjust the config first.
    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let mut config = AppConfig::for_testing();
        config.storage.uploads_dir = temp_dir.path().join("uploads");
        config.storage.converted_dir = temp_dir.path().join("converted");
        customize(&mut config);

        let chunks = Arc::new(
            ChunkStore::new(&config.storage.uploads_dir)
                .await
                .expect("Failed to create chunk store"),
        );
        let artifacts = Arc::new(
            ArtifactStore::new(&config.storage.converted_dir)
                .await
                .expect("Failed to create artifact store"),
        );

        let state = AppState::new(config, chunks, artifacts);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Directory holding pending upload sessions.
    pub fn uploads_dir(&self) -> std::path::PathBuf {
        self.state.chunks.root().to_path_buf()
    }

    /// Directory holding converted artifacts.
    pub fn converted_dir(&self) -> std::path::PathBuf {
        self.state.artifacts.root().to_path_buf()
    }

    /// Send a request and collect the full response body.
    pub async fn request(&self, request: Request<Body>) -> (StatusCode, bytes::Bytes) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body)
    }

    /// GET a URI, returning the status and raw body.
    pub async fn get(&self, uri: &str) -> (StatusCode, bytes::Bytes) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }

    /// POST a JSON value, returning the status and parsed JSON body.
    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let (status, bytes) = self.request(request).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// POST a multipart body, returning the status and raw body.
    pub async fn post_multipart(
        &self,
        uri: &str,
        parts: &[(&str, Option<&str>, &[u8])],
    ) -> (StatusCode, bytes::Bytes) {
        let (body, content_type) = super::fixtures::multipart_body(parts);
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }
}
