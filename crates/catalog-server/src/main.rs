//! # Catalog Cache Server
//!
//! Loads configuration, wires the cache layer and serves the operational
//! endpoints until Ctrl+C or SIGTERM.

use anyhow::Context;
use catalog_cache::metrics::register_metrics;
use catalog_config::ConfigLoader;
use catalog_core::{init_tracing, CatalogResult};
use catalog_server::di::{build_cache_manager, build_cache_module};
use catalog_server::{create_router, AppState};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Logging may not be up yet when configuration fails.
        eprintln!("Application error: {:#}", e);
        error!("Application error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> CatalogResult<()> {
    // Load configuration
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_tracing(
        Some(&config.observability.log_level),
        config.observability.log_format,
    )?;

    info!("Starting {}...", config.app.name);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if config.observability.metrics_enabled {
        register_metrics();
    }

    let module = build_cache_module(&config.redis)?;
    let cache = Arc::new(build_cache_manager(&module, &config.cache));

    if cache.is_healthy().await {
        info!("Cache store reachable (namespace '{}')", cache.namespace());
    } else {
        warn!("Cache store unreachable; serving with every read missing");
    }

    let router = create_router(AppState::new(cache), &config.server);

    let addr = config.server.addr();
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
