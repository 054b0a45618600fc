//! Rental Cache - cache service entry point
//!
//! Builds the image and property caches, runs their expiration sweeps and
//! serves the monitoring API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rental_cache::api::create_router;
use rental_cache::domains::Sweepable;
use rental_cache::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the image and property caches
/// 4. Start one background TTL sweep per cache
/// 5. Serve the monitoring API on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rental_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Rental Cache service");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: images={:?}, properties={:?}, port={}, cleanup_interval={}s",
        config.images, config.properties, config.server_port, config.cleanup_interval
    );

    let state = AppState::from_config(&config);
    info!("Caches initialized");

    let cleanup_handles = if config.cleanup_interval > 0 {
        let interval = Duration::from_secs(config.cleanup_interval);
        let targets: [Arc<dyn Sweepable>; 2] = [state.images.clone(), state.properties.clone()];
        targets
            .into_iter()
            .map(|cache| spawn_cleanup_task(cache, interval))
            .collect()
    } else {
        warn!("CLEANUP_INTERVAL_SECS is 0, expired entries are only removed on lookup");
        Vec::new()
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handles))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup tasks and allows graceful shutdown.
async fn shutdown_signal(cleanup_handles: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for handle in &cleanup_handles {
        handle.abort();
    }
    warn!("Cleanup tasks aborted");
}
