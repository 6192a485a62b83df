//! # Geo-Accuracy API
//!
//! REST service for positional-accuracy assessment of paired coordinate
//! uploads.
//!
//! ## Features
//!
//! - **Upload & Compute**: two spreadsheets in, accuracy report out
//! - **Persistence**: explicit save of confirmed assessments
//! - **Listing**: paginated entry history, per-entry point rows
//! - **Export**: CSV download of every stored point
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                         │
//! │        (multipart upload, JSON reads, CSV download)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ApiContext                               │
//! │             (MetricsEngine, AccuracyStore)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │    accuracy-engine      │   │       accuracy-store         │
//! │  (pure computation)     │   │    (DuckDB, entries/points)  │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod sheets;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use context::ApiContext;
pub use error::{ApiError, ApiResult};

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

/// Build the Axum router
pub fn build_router(ctx: ApiContext) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let max_upload_bytes = ctx.max_upload_bytes;

    Router::new()
        // Assessment endpoints
        .route("/api/upload", post(handlers::upload::process_upload))
        .route(
            "/api/entries",
            post(handlers::entries::save_entry).get(handlers::entries::list_entries),
        )
        .route(
            "/api/entries/{entry_id}/points",
            get(handlers::entries::entry_points),
        )
        .route("/api/export/csv", get(handlers::export::download_csv))
        // Health check
        .route("/health", get(health_check))
        .route("/", get(|| async { "Geo-Accuracy API" }))
        // State and middleware
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
