//! Splitpack server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use splitpack_core::AppConfig;
use splitpack_server::{AppState, create_router};
use splitpack_storage::{ArtifactStore, ChunkStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Splitpack - chunked-upload APK bundle converter
#[derive(Parser, Debug)]
#[command(name = "splitpackd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "SPLITPACK_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Splitpack v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override
    // everything; the defaults are workable for local use)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("SPLITPACK_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Register Prometheus metrics
    splitpack_server::metrics::register_metrics();

    // Initialize storage
    let chunks = Arc::new(
        ChunkStore::new(&config.storage.uploads_dir)
            .await
            .context("failed to initialize chunk store")?,
    );
    let artifacts = Arc::new(
        ArtifactStore::new(&config.storage.converted_dir)
            .await
            .context("failed to initialize artifact store")?,
    );

    // Verify storage accessibility before accepting requests
    chunks
        .health_check()
        .await
        .context("chunk store health check failed")?;
    artifacts
        .health_check()
        .await
        .context("artifact store health check failed")?;
    tracing::info!(
        uploads = %config.storage.uploads_dir.display(),
        converted = %config.storage.converted_dir.display(),
        "Storage initialized"
    );

    let bind = config.server.bind.clone();
    let state = AppState::new(config, chunks, artifacts);

    // Spawn the stale-session sweep
    let _sweep_handle = splitpack_server::sweep::spawn_sweep_task(state.clone());
    tracing::info!("Stale-session sweep spawned");

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(bind = %bind, "Listening");

    axum::serve(listener, router).await.context("server error")?;

    Ok(())
}
