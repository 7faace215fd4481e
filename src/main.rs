use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ip_locator::api;
use ip_locator::config::Config;
use ip_locator::service::LocationService;
use ip_locator::storage::RangeTable;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Load the dataset before accepting any request
    info!("Loading IP ranges from {}", config.dataset.csv_path);
    let table = RangeTable::load(&config.dataset.csv_path)
        .with_context(|| format!("failed to initialize range table from {}", config.dataset.csv_path))?;
    info!(
        ranges = table.len(),
        skipped = table.skipped_rows(),
        "Range table ready"
    );
    if table.is_empty() {
        warn!("Dataset contains no usable ranges; every lookup will return 404");
    }

    let service = LocationService::new(Arc::new(table));
    let router = api::create_api_router(service);

    let listener = tokio::net::TcpListener::bind(config.server.address).await?;
    info!(
        "🚀 Server listening on http://{} (version {})",
        config.server.address,
        env!("CARGO_PKG_VERSION")
    );
    info!("   - GET /ip/location?ip=<address>");
    info!("   - GET /health");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}
