//! Splitpack HTTP server.
//!
//! Ties the chunk store, archive extractor, and artifact store together
//! behind the HTTP surface: chunked uploads, conversion, downloads, and the
//! PDF word-list tool.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod sweep;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
