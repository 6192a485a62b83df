//! # API Context
//!
//! Application state shared across handlers. The store is constructed once
//! in `main`, owned here, and handed out as a scoped mutex guard per
//! operation; there is no process-wide connection.

use std::sync::Arc;
use tokio::sync::Mutex;

use accuracy_engine::MetricsEngine;
use accuracy_store::AccuracyStore;

/// Application context shared across all handlers
#[derive(Clone)]
pub struct ApiContext {
    /// Persistence; one guard per operation
    pub store: Arc<Mutex<AccuracyStore>>,

    /// Metrics engine (pure, shared read-only)
    pub engine: Arc<MetricsEngine>,

    /// Entries per listing page
    pub page_size: u32,

    /// Maximum accepted upload body size in bytes
    pub max_upload_bytes: usize,
}

impl ApiContext {
    /// Create a new API context
    pub fn new(store: AccuracyStore, page_size: u32, max_upload_bytes: usize) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            engine: Arc::new(MetricsEngine::new()),
            page_size,
            max_upload_bytes,
        }
    }
}
