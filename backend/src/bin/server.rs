//! EDX ingest HTTP server binary.
//!
//! Loads configuration, wires the daily failure log into the ingest pipeline,
//! and serves the HTTP API until Ctrl-C.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin edx-server
//!
//! # Custom port and scratch area
//! PORT=9000 EDX_SCRATCH_DIR=/var/tmp/edx cargo run --bin edx-server
//! ```
//!
//! See [`edx_ingest::config`] for all environment variables. `RUST_LOG` sets
//! the log level (default: info).

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use edx_ingest::config::ServiceConfig;
use edx_ingest::http::{create_router, AppState};
use edx_ingest::logging::DailyFileLog;
use edx_ingest::pipeline::IngestPipeline;
use edx_ingest::storage::ScratchStore;

/// Scratch files older than this at startup belong to no live request.
const ORPHAN_MIN_AGE: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting EDX ingest server");

    let config = ServiceConfig::load()?;
    tokio::fs::create_dir_all(&config.scratch_dir).await?;
    if let Err(e) = ScratchStore::new(&config.scratch_dir)
        .sweep_orphans(ORPHAN_MIN_AGE)
        .await
    {
        tracing::warn!(error = %e, "failed to sweep scratch directory");
    }

    let failure_log = DailyFileLog::new(&config.log_dir)?;
    info!(
        log_dir = %failure_log.dir().display(),
        scratch_dir = %config.scratch_dir.display(),
        "Failure log and scratch area ready"
    );

    let pipeline = IngestPipeline::from_config(&config, Arc::new(failure_log));
    let state = AppState::from_config(Arc::new(pipeline), &config);

    // Create router with all endpoints
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
