//! Tests for the landing page, health check, and metrics endpoint.

mod common;

use axum::http::StatusCode;
use common::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_index_describes_converter() {
    let server = TestServer::new().await;

    let (status, body) = server.get("/").await;
    assert_eq!(status, StatusCode::OK);

    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("APKs to APK converter"));
    assert!(page.contains("/upload-chunk"));
    assert!(page.contains("/wordlist"));
}

#[tokio::test]
async fn test_health_check_reports_ok() {
    let server = TestServer::new().await;

    let (status, body) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json.get("status").and_then(Value::as_str), Some("ok"));
    assert!(json.get("version").and_then(Value::as_str).is_some());
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_counters() {
    splitpack_server::metrics::register_metrics();
    let server = TestServer::new().await;

    let (status, body) = server.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("splitpack_chunks_received_total"));
    assert!(text.contains("splitpack_conversions_completed_total"));
}

#[tokio::test]
async fn test_metrics_endpoint_can_be_disabled() {
    let server = TestServer::with_config(|config| {
        config.server.metrics_enabled = false;
    })
    .await;

    let (status, _) = server.get("/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
