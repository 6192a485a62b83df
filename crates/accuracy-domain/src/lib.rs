//! # Geo-Accuracy Service - Domain Model
//!
//! Core domain entities and value objects for positional-accuracy
//! assessment. These types are the single source of truth across all
//! layers: engine, persistence, and API.
//!
//! Wire names are camelCase to match the established JSON contract of the
//! service (`stdDev`, `isOutlier`, `totalEntries`, ...).

use chrono::{DateTime, Utc};
use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// A single measured geographic position in decimal degrees.
///
/// Transient: exists only while a pair of uploaded datasets is being
/// processed. Construction validates the coordinate ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRecord {
    pub latitude: f64,
    pub longitude: f64,
}

impl CoordinateRecord {
    /// Create a record, rejecting coordinates outside valid ranges
    /// (latitude [-90, 90], longitude [-180, 180]).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to another point in meters (haversine).
    ///
    /// Symmetric, and zero exactly when both records are equal.
    #[must_use]
    pub fn distance_m(&self, other: &Self) -> f64 {
        Haversine::distance(
            Point::new(self.longitude, self.latitude),
            Point::new(other.longitude, other.latitude),
        )
    }
}

/// One measured/reference coordinate pair with its positional error.
///
/// `is_outlier` is meaningful only after the full distance population has
/// been classified; it is `false` until then.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointPair {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
    /// Great-circle distance between the two positions, meters.
    pub distance: f64,
    pub is_outlier: bool,
}

/// Aggregate accuracy statistics over a set of pair distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    /// Arithmetic mean of the distances, meters.
    pub mean: f64,
    /// Sample standard deviation (n-1), meters.
    pub std_dev: f64,
    /// Circular error at 90% confidence, meters.
    pub ce90: f64,
}

// =============================================================================
// ENGINE OUTPUT
// =============================================================================

/// Full result of one accuracy computation: both summaries plus the
/// annotated pairs in original positional order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyReport {
    pub all_metrics: MetricsSummary,
    pub non_outlier_metrics: MetricsSummary,
    pub points: Vec<PointPair>,
}

// =============================================================================
// PERSISTED ENTITIES
// =============================================================================

/// A computed result submitted for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub file1_name: String,
    pub file2_name: String,
    pub created_at: DateTime<Utc>,
    pub all_metrics: MetricsSummary,
    pub non_outlier_metrics: MetricsSummary,
    pub points: Vec<PointPair>,
}

/// A persisted accuracy-assessment entry (summary row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: i64,
    pub file1_name: String,
    pub file2_name: String,
    pub created_at: DateTime<Utc>,
    pub all_metrics: MetricsSummary,
    pub non_outlier_metrics: MetricsSummary,
}

/// A persisted point row. `index` is 1-based and preserves upload order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPoint {
    pub entry_id: i64,
    pub index: i32,
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
    pub distance: f64,
    pub is_outlier: bool,
}

// =============================================================================
// QUERY TYPES
// =============================================================================

/// One page of persisted entries, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPage {
    pub total_entries: i64,
    pub total_pages: i64,
    pub current_page: u32,
    pub entries: Vec<Entry>,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid coordinates: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}
