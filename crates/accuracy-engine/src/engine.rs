//! Pairing and accuracy-metrics computation.

use statrs::statistics::Statistics;
use tracing::debug;

use accuracy_domain::{AccuracyReport, CoordinateRecord, MetricsSummary, PointPair};

use crate::error::{EngineError, Result};
use crate::fields::{LATITUDE_ALIASES, LONGITUDE_ALIASES, RawRecord, resolve_coordinate};

/// CE90 multiplier under a circular-normal error distribution.
pub const CE90_FACTOR: f64 = 2.1460;

/// Default number of standard deviations above the mean beyond which a
/// point is classified an outlier.
pub const DEFAULT_OUTLIER_SIGMA: f64 = 2.0;

/// Positional-accuracy metrics engine.
///
/// Stateless apart from its threshold configuration; every invocation is an
/// isolated, deterministic computation over the supplied datasets.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    outlier_sigma: f64,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsEngine {
    /// Create an engine with the default outlier threshold.
    #[must_use]
    pub fn new() -> Self {
        Self {
            outlier_sigma: DEFAULT_OUTLIER_SIGMA,
        }
    }

    /// Create an engine with a custom outlier sigma multiplier.
    #[must_use]
    pub fn with_outlier_sigma(outlier_sigma: f64) -> Self {
        Self { outlier_sigma }
    }

    /// Pair two datasets positionally and measure each pair's distance.
    ///
    /// Iterates indices `0 .. min(len_a, len_b)`. An index where any of the
    /// four coordinate values fails to resolve (or fails range validation)
    /// contributes no pair and is skipped silently. Returned pairs have
    /// `is_outlier` unset (`false`).
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyDataset`] when zero pairs survive.
    pub fn pair_and_measure(
        &self,
        dataset_a: &[RawRecord],
        dataset_b: &[RawRecord],
    ) -> Result<Vec<PointPair>> {
        let len = dataset_a.len().min(dataset_b.len());
        let mut pairs = Vec::with_capacity(len);
        let mut skipped = 0usize;

        for i in 0..len {
            let (Some(measured), Some(reference)) =
                (read_record(&dataset_a[i]), read_record(&dataset_b[i]))
            else {
                skipped += 1;
                continue;
            };

            pairs.push(PointPair {
                lat1: measured.latitude,
                lon1: measured.longitude,
                lat2: reference.latitude,
                lon2: reference.longitude,
                distance: measured.distance_m(&reference),
                is_outlier: false,
            });
        }

        debug!(paired = pairs.len(), skipped, "paired coordinate datasets");

        if pairs.is_empty() {
            return Err(EngineError::EmptyDataset);
        }
        Ok(pairs)
    }

    /// Compute both summaries and annotate each pair's outlier status.
    ///
    /// A pair is an outlier when its distance exceeds
    /// `mean + outlier_sigma * std_dev` of the full population. The
    /// non-outlier summary falls back to the full-population summary if
    /// classification were to remove every point.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyDataset`] when called with no pairs.
    pub fn compute_metrics(&self, mut pairs: Vec<PointPair>) -> Result<AccuracyReport> {
        if pairs.is_empty() {
            return Err(EngineError::EmptyDataset);
        }

        let distances: Vec<f64> = pairs.iter().map(|p| p.distance).collect();
        let all_metrics = summarize(&distances);

        let threshold = all_metrics.mean + self.outlier_sigma * all_metrics.std_dev;
        for pair in &mut pairs {
            pair.is_outlier = pair.distance > threshold;
        }

        let kept: Vec<f64> = pairs
            .iter()
            .filter(|p| !p.is_outlier)
            .map(|p| p.distance)
            .collect();

        debug!(
            total = pairs.len(),
            outliers = pairs.len() - kept.len(),
            threshold,
            "classified outliers"
        );

        let non_outlier_metrics = if kept.is_empty() {
            all_metrics
        } else {
            summarize(&kept)
        };

        Ok(AccuracyReport {
            all_metrics,
            non_outlier_metrics,
            points: pairs,
        })
    }

    /// Pair, measure, and summarize in one pass.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyDataset`] when no usable pairs exist.
    pub fn analyze(
        &self,
        dataset_a: &[RawRecord],
        dataset_b: &[RawRecord],
    ) -> Result<AccuracyReport> {
        let pairs = self.pair_and_measure(dataset_a, dataset_b)?;
        self.compute_metrics(pairs)
    }
}

fn read_record(record: &RawRecord) -> Option<CoordinateRecord> {
    let lat = resolve_coordinate(record, &LATITUDE_ALIASES)?;
    let lon = resolve_coordinate(record, &LONGITUDE_ALIASES)?;
    CoordinateRecord::new(lat, lon).ok()
}

/// Summarize a non-empty distance set.
///
/// Sample standard deviation (n-1); a single-element set yields
/// `std_dev = 0` and `ce90 = 0` rather than a division error.
fn summarize(distances: &[f64]) -> MetricsSummary {
    let mean = distances.iter().mean();
    let std_dev = if distances.len() < 2 {
        0.0
    } else {
        distances.iter().std_dev()
    };

    MetricsSummary {
        mean,
        std_dev,
        ce90: CE90_FACTOR * std_dev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(lat: f64, lon: f64) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("Latitude".to_string(), json!(lat));
        record.insert("Longitude".to_string(), json!(lon));
        record
    }

    fn rec_abbrev(lat: f64, lon: f64) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("lat".to_string(), json!(lat.to_string()));
        record.insert("lon".to_string(), json!(lon.to_string()));
        record
    }

    fn bad_rec() -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("Latitude".to_string(), json!("n/a"));
        record.insert("Longitude".to_string(), json!("n/a"));
        record
    }

    #[test]
    fn truncates_to_shorter_dataset() {
        let a: Vec<_> = (0..5).map(|i| rec(10.0 + f64::from(i) * 0.01, 20.0)).collect();
        let b: Vec<_> = (0..3).map(|i| rec(10.0 + f64::from(i) * 0.01, 20.0)).collect();

        let pairs = MetricsEngine::new().pair_and_measure(&a, &b).unwrap();
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn unparseable_rows_are_skipped() {
        let a = vec![rec(10.0, 20.0), bad_rec(), rec(10.0, 20.0)];
        let b = vec![rec(10.0, 20.0), rec(10.0, 20.0), rec(95.0, 20.0)];

        // Row 1 fails to parse, row 2 fails latitude range validation.
        let pairs = MetricsEngine::new().pair_and_measure(&a, &b).unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn fully_unparseable_dataset_is_an_error() {
        let a = vec![bad_rec(), bad_rec()];
        let b = vec![rec(10.0, 20.0), rec(10.0, 20.0)];

        let err = MetricsEngine::new().pair_and_measure(&a, &b).unwrap_err();
        assert!(matches!(err, EngineError::EmptyDataset));
    }

    #[test]
    fn abbreviated_string_headers_resolve() {
        let a = vec![rec_abbrev(10.0, 20.0)];
        let b = vec![rec(10.001, 20.0)];

        let pairs = MetricsEngine::new().pair_and_measure(&a, &b).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].distance > 100.0);
    }

    #[test]
    fn known_scenario_distances_and_mean() {
        let a = vec![rec(10.0, 20.0), rec(10.0, 20.0)];
        let b = vec![rec(10.0, 20.0), rec(10.001, 20.0)];

        let report = MetricsEngine::new().analyze(&a, &b).unwrap();
        assert_eq!(report.points.len(), 2);
        assert!(report.points[0].distance < 1e-6);
        assert!((report.points[1].distance - 111.2).abs() < 0.5);
        assert!((report.all_metrics.mean - 55.6).abs() < 0.6);
    }

    #[test]
    fn single_pair_has_zero_spread_and_no_outliers() {
        let a = vec![rec(10.0, 20.0)];
        let b = vec![rec(10.001, 20.0)];

        let report = MetricsEngine::new().analyze(&a, &b).unwrap();
        assert_eq!(report.all_metrics.std_dev, 0.0);
        assert_eq!(report.all_metrics.ce90, 0.0);
        assert!(!report.points[0].is_outlier);
        assert_eq!(report.all_metrics, report.non_outlier_metrics);
    }

    #[test]
    fn summaries_equal_when_nothing_is_classified() {
        let a = vec![rec(10.0, 20.0), rec(10.0, 20.0)];
        let b = vec![rec(10.0, 20.0), rec(10.001, 20.0)];

        // Two points cannot exceed mean + 2 sigma of their own population.
        let report = MetricsEngine::new().analyze(&a, &b).unwrap();
        assert!(report.points.iter().all(|p| !p.is_outlier));
        assert_eq!(report.all_metrics, report.non_outlier_metrics);
    }

    #[test]
    fn far_point_is_classified_outlier() {
        let a: Vec<_> = (0..10).map(|_| rec(10.0, 20.0)).collect();
        let mut b: Vec<_> = (0..9).map(|_| rec(10.0, 20.0)).collect();
        b.push(rec(10.01, 20.0)); // roughly 1.1 km off

        let report = MetricsEngine::new().analyze(&a, &b).unwrap();
        let outliers: Vec<_> = report.points.iter().filter(|p| p.is_outlier).collect();
        assert_eq!(outliers.len(), 1);
        assert!(report.points[9].is_outlier);
        assert!(report.non_outlier_metrics.mean <= report.all_metrics.mean);
        assert!(report.non_outlier_metrics.mean < 1e-6);
    }

    #[test]
    fn compute_metrics_is_idempotent() {
        let a = vec![rec(10.0, 20.0), rec(10.0, 20.0), rec(10.0, 20.0)];
        let b = vec![rec(10.0, 20.0), rec(10.001, 20.0), rec(10.002, 20.0)];

        let engine = MetricsEngine::new();
        let pairs = engine.pair_and_measure(&a, &b).unwrap();
        let first = engine.compute_metrics(pairs.clone()).unwrap();
        let second = engine.compute_metrics(pairs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn compute_metrics_rejects_empty_input() {
        let err = MetricsEngine::new().compute_metrics(Vec::new()).unwrap_err();
        assert!(matches!(err, EngineError::EmptyDataset));
    }
}
