//! FZ152 Filter - HTTP server entry point

use std::sync::Arc;

use anyhow::{Context, Result};
use fz152_api::{create_router, AppContext};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the config loader reads FZ152_* variables
    let dotenv = dotenvy::dotenv();

    let config = fz152_infra::load().context("Failed to load configuration")?;
    fz152_infra::init_tracing(&config.logging).context("Failed to initialize logging")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    let address = format!("{}:{}", config.server.host, config.server.port);
    let context = Arc::new(AppContext::new(config).context("Failed to build privacy filter")?);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "FZ152 filter listening");

    axum::serve(listener, create_router(context))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
