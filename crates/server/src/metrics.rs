//! Prometheus metrics for the Splitpack server.
//!
//! Exposes counters for upload and conversion activity and a latency
//! histogram for the conversion pipeline. The `/metrics` endpoint is
//! unauthenticated for Prometheus scraping and should be network-restricted
//! at the infrastructure level; disable it entirely with
//! `server.metrics_enabled = false`.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static CHUNKS_RECEIVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "splitpack_chunks_received_total",
        "Total number of upload chunks stored",
    )
    .expect("metric creation failed")
});

pub static BYTES_RECEIVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "splitpack_bytes_received_total",
        "Total chunk bytes stored",
    )
    .expect("metric creation failed")
});

pub static CONVERSIONS_COMPLETED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "splitpack_conversions_completed_total",
        "Total number of conversions that produced an artifact",
    )
    .expect("metric creation failed")
});

pub static CONVERSIONS_FAILED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "splitpack_conversions_failed_total",
        "Total number of conversions that failed",
    )
    .expect("metric creation failed")
});

pub static ARTIFACTS_DOWNLOADED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "splitpack_artifacts_downloaded_total",
        "Total number of artifact downloads served",
    )
    .expect("metric creation failed")
});

pub static WORDLISTS_PARSED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "splitpack_wordlists_parsed_total",
        "Total number of PDF word lists extracted",
    )
    .expect("metric creation failed")
});

pub static SESSIONS_SWEPT: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "splitpack_sessions_swept_total",
        "Total number of stale upload sessions removed by the sweep",
    )
    .expect("metric creation failed")
});

pub static CONVERT_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "splitpack_convert_duration_seconds",
            "Time taken to merge, extract, and persist one conversion",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .expect("metric creation failed")
});

static REGISTER: Once = Once::new();

/// Register all metrics with the global registry. Idempotent.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(CHUNKS_RECEIVED.clone()),
            Box::new(BYTES_RECEIVED.clone()),
            Box::new(CONVERSIONS_COMPLETED.clone()),
            Box::new(CONVERSIONS_FAILED.clone()),
            Box::new(ARTIFACTS_DOWNLOADED.clone()),
            Box::new(WORDLISTS_PARSED.clone()),
            Box::new(SESSIONS_SWEPT.clone()),
            Box::new(CONVERT_DURATION.clone()),
        ];
        for collector in collectors {
            REGISTRY
                .register(collector)
                .expect("metric registration failed");
        }
    });
}

/// GET /metrics - Prometheus exposition format.
pub async fn metrics_handler() -> impl IntoResponse {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, Vec::new()).into_response();
    }
    (StatusCode::OK, buffer).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics_is_idempotent() {
        register_metrics();
        register_metrics();

        CHUNKS_RECEIVED.inc();
        let families = REGISTRY.gather();
        assert!(
            families
                .iter()
                .any(|f| f.get_name() == "splitpack_chunks_received_total")
        );
    }
}
