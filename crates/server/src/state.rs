//! Application state shared across handlers.

use splitpack_core::AppConfig;
use splitpack_storage::{ArtifactStore, ChunkStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry handing out one async lock per upload session.
///
/// Chunk writes and the convert transition for one session must not
/// interleave: concurrent writes could race on directory creation, and a
/// convert racing an in-flight chunk upload would merge a half-written
/// file. Callers hold the session's guard for the duration of the
/// filesystem work.
#[derive(Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `session`, creating it on first use.
    pub async fn acquire(&self, session: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(session.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop the registry entry for a removed session.
    ///
    /// A waiter already holding the old `Arc` finishes on it; the next
    /// `acquire` for the same token starts fresh.
    pub async fn release(&self, session: &str) {
        self.locks.lock().await.remove(session);
    }

    /// Number of sessions currently tracked.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Whether no sessions are tracked.
    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Pending-chunk storage.
    pub chunks: Arc<ChunkStore>,
    /// Finished-artifact storage.
    pub artifacts: Arc<ArtifactStore>,
    /// Per-session locks.
    pub sessions: SessionLocks,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: AppConfig, chunks: Arc<ChunkStore>, artifacts: Arc<ArtifactStore>) -> Self {
        Self {
            config: Arc::new(config),
            chunks,
            artifacts,
            sessions: SessionLocks::new(),
        }
    }

    /// Get the stale-session sweep interval.
    ///
    /// Returns a default of 60 seconds if the interval is configured as
    /// zero (to prevent `tokio::time::interval` from panicking).
    pub fn sweep_interval(&self) -> Duration {
        let interval_secs = self.config.server.session_sweep_interval_secs;
        if interval_secs == 0 {
            tracing::warn!("server.session_sweep_interval_secs is 0, using default of 60 seconds");
            Duration::from_secs(60)
        } else {
            Duration::from_secs(interval_secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn build_state(config: AppConfig) -> (tempfile::TempDir, AppState) {
        let temp = tempfile::tempdir().unwrap();
        let chunks = Arc::new(ChunkStore::new(temp.path().join("uploads")).await.unwrap());
        let artifacts = Arc::new(
            ArtifactStore::new(temp.path().join("converted"))
                .await
                .unwrap(),
        );
        let state = AppState::new(config, chunks, artifacts);
        (temp, state)
    }

    #[tokio::test]
    async fn test_sweep_interval_respects_config() {
        let mut config = AppConfig::for_testing();
        config.server.session_sweep_interval_secs = 12;
        let (_temp, state) = build_state(config).await;
        assert_eq!(state.sweep_interval(), Duration::from_secs(12));
    }

    #[tokio::test]
    async fn test_sweep_interval_zero_uses_default() {
        let mut config = AppConfig::for_testing();
        config.server.session_sweep_interval_secs = 0;
        let (_temp, state) = build_state(config).await;
        assert_eq!(state.sweep_interval(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_session_locks_serialize_one_session() {
        let locks = SessionLocks::new();

        let guard = locks.acquire("t1").await;
        // A second acquire for the same session must wait.
        let pending = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("t1").await;
            })
        };
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        // A different session is independent.
        let _other = locks.acquire("t2").await;

        drop(guard);
        pending.await.unwrap();
    }

    #[tokio::test]
    async fn test_release_drops_registry_entry() {
        let locks = SessionLocks::new();
        drop(locks.acquire("t1").await);
        assert_eq!(locks.len().await, 1);
        locks.release("t1").await;
        assert!(locks.is_empty().await);
    }
}
