//! # Accuracy Store
//!
//! Relational persistence for accuracy assessments, backed by DuckDB.
//! One `entries` row per assessment (both metric summaries inline) plus one
//! `points` row per measured/reference pair.
//!
//! ## Features
//!
//! - In-memory or file-backed database, schema initialized at open
//! - Entry + point persistence in upload order (1-based point index)
//! - Paginated entry listing, newest first
//! - Full CSV export of all stored points

#![forbid(unsafe_code)]
#![warn(clippy::all, missing_docs)]

pub mod error;
pub mod export;
pub mod store;

pub use error::StoreError;
pub use store::AccuracyStore;
