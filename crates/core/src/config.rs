//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum size of a single uploaded chunk in bytes.
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: u64,
    /// How long an idle upload session lives before the sweep removes it.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Interval between stale-session sweeps.
    #[serde(default = "default_session_sweep_interval_secs")]
    pub session_sweep_interval_secs: u64,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_chunk_size() -> u64 {
    crate::DEFAULT_MAX_CHUNK_SIZE
}

fn default_session_ttl_secs() -> u64 {
    86400 // 24 hours
}

fn default_session_sweep_interval_secs() -> u64 {
    900 // 15 minutes
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_chunk_size: default_max_chunk_size(),
            session_ttl_secs: default_session_ttl_secs(),
            session_sweep_interval_secs: default_session_sweep_interval_secs(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl ServerConfig {
    /// Get the session TTL as a Duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

/// Storage directory configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for pending upload sessions.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    /// Directory for finished artifacts awaiting download.
    #[serde(default = "default_converted_dir")]
    pub converted_dir: PathBuf,
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("./data/uploads")
}

fn default_converted_dir() -> PathBuf {
    PathBuf::from("./data/converted")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            converted_dir: default_converted_dir(),
        }
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Create a test configuration.
    ///
    /// **For testing only.** Binds an ephemeral port; storage paths should
    /// be pointed at temporary directories by the caller.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                bind: "127.0.0.1:0".to_string(),
                ..Default::default()
            },
            storage: StorageConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_to_empty_config() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.max_chunk_size, crate::DEFAULT_MAX_CHUNK_SIZE);
        assert!(config.server.metrics_enabled);
        assert_eq!(config.storage.uploads_dir, PathBuf::from("./data/uploads"));
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server":{"max_chunk_size":1024}}"#).unwrap();
        assert_eq!(config.server.max_chunk_size, 1024);
        assert_eq!(config.server.session_ttl_secs, 86400);
    }

    #[test]
    fn test_session_ttl_duration() {
        let mut config = ServerConfig::default();
        config.session_ttl_secs = 60;
        assert_eq!(config.session_ttl(), Duration::from_secs(60));
    }
}
