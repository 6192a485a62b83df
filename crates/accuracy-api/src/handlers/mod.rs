//! HTTP handlers, one module per resource.

pub mod entries;
pub mod export;
pub mod upload;
