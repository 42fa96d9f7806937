//! Background sweep of stale upload sessions.

use crate::metrics::SESSIONS_SWEPT;
use crate::state::AppState;
use tokio::task::JoinHandle;

/// Spawn the periodic stale-session sweep.
///
/// A client that uploads chunks but never calls convert would otherwise
/// leave its session directory behind forever. Sessions whose directory has
/// not been touched within the configured TTL are removed. Sweep failures
/// are logged and never fatal.
pub fn spawn_sweep_task(state: AppState) -> JoinHandle<()> {
    let interval = state.sweep_interval();
    let ttl = state.config.server.session_ttl();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match state.chunks.sweep_stale(ttl).await {
                Ok(0) => {}
                Ok(removed) => {
                    SESSIONS_SWEPT.inc_by(removed as u64);
                    tracing::info!(removed, "Removed stale upload sessions");
                }
                Err(e) => tracing::warn!(error = %e, "Session sweep failed"),
            }
        }
    })
}
