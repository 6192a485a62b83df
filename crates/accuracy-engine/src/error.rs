//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the metrics engine.
///
/// Unparseable individual rows are not errors: they are skipped during
/// pairing and never surfaced. The only failure the engine reports is a
/// dataset that yields no usable pairs at all.
#[derive(Debug, Error)]
pub enum EngineError {
    /// After pairing and validation, zero usable pairs remain.
    #[error("no valid coordinate pairs in the supplied datasets")]
    EmptyDataset,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
