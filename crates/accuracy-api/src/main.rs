//! # Geo-Accuracy API Server
//!
//! Binary entry point for the accuracy assessment service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accuracy_api::{ApiContext, Config, build_router};
use accuracy_store::AccuracyStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!(version = accuracy_api::VERSION, "Starting Geo-Accuracy API");

    // Open the store
    let store = if config.database.path == ":memory:" {
        tracing::info!("Opening in-memory database");
        AccuracyStore::new_in_memory()?
    } else {
        tracing::info!(path = %config.database.path, "Opening database");
        AccuracyStore::new_persistent(&config.database.path)?
    };

    // Build application context and router
    let ctx = ApiContext::new(store, config.entries_page_size, config.max_upload_bytes);
    let app = build_router(ctx);

    // Start server
    let addr = config.server_addr;
    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
