//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Extra allowance on top of the max chunk size for multipart framing.
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_chunk_size as usize + BODY_LIMIT_OVERHEAD;

    let mut router = Router::new()
        // Converter landing page
        .route("/", get(handlers::index))
        // Health check (intentionally unauthenticated for probes)
        .route("/health", get(handlers::health_check))
        // Chunked upload pipeline
        .route("/upload-chunk", post(handlers::upload_chunk))
        .route("/convert", post(handlers::convert))
        .route("/download/{filename}", get(handlers::download))
        // PDF word-list tool
        .route(
            "/wordlist",
            get(handlers::wordlist_form).post(handlers::wordlist_extract),
        );

    // Conditionally add the metrics endpoint based on config.
    if state.config.server.metrics_enabled {
        router = router.merge(Router::new().route("/metrics", get(metrics_handler)));
    }

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
