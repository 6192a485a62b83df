//! CSV export of all stored points.

use std::fs;
use tracing::debug;

use crate::error::Result;
use crate::store::AccuracyStore;

impl AccuracyStore {
    /// Export every stored point, joined to its entry, as a CSV document.
    ///
    /// Staged through a DuckDB `COPY` into a temp file that is removed once
    /// read back.
    ///
    /// # Errors
    ///
    /// [`crate::StoreError::DuckDb`] on query failure,
    /// [`crate::StoreError::Io`] if the staging file cannot be created or
    /// read.
    pub fn export_csv(&self) -> Result<String> {
        let staging = tempfile::Builder::new()
            .prefix("accuracy_export")
            .suffix(".csv")
            .tempfile()?;
        let path = staging.path().display().to_string();

        let query = format!(
            r#"
            COPY (
                SELECT
                    e.file1_name AS "Measured File",
                    e.file2_name AS "Reference File",
                    p.lat1 AS "Measured Latitude",
                    p.lon1 AS "Measured Longitude",
                    p.lat2 AS "Reference Latitude",
                    p.lon2 AS "Reference Longitude",
                    p.distance AS "Distance (m)",
                    p.is_outlier AS "Is Outlier",
                    p.point_index AS "Point Index"
                FROM points p
                INNER JOIN entries e ON p.entry_id = e.id
                ORDER BY p.entry_id, p.point_index
            ) TO '{}' (FORMAT CSV, HEADER)
            "#,
            path.replace('\'', "''")
        );
        self.conn.execute(&query, [])?;

        let csv = fs::read_to_string(staging.path())?;
        debug!(bytes = csv.len(), "CSV export staged");
        Ok(csv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accuracy_domain::{MetricsSummary, NewEntry, PointPair};
    use chrono::{TimeZone, Utc};

    fn entry_with_one_point() -> NewEntry {
        let summary = MetricsSummary {
            mean: 111.2,
            std_dev: 0.0,
            ce90: 0.0,
        };
        NewEntry {
            file1_name: "measured.xlsx".to_string(),
            file2_name: "reference.xlsx".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            all_metrics: summary,
            non_outlier_metrics: summary,
            points: vec![PointPair {
                lat1: 10.0,
                lon1: 20.0,
                lat2: 10.001,
                lon2: 20.0,
                distance: 111.2,
                is_outlier: false,
            }],
        }
    }

    #[test]
    fn export_contains_headers_and_rows() {
        let store = AccuracyStore::new_in_memory().unwrap();
        store.insert_entry(&entry_with_one_point()).unwrap();
        store.insert_entry(&entry_with_one_point()).unwrap();

        let csv = store.export_csv().unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.contains("Measured File"));
        assert!(header.contains("Distance (m)"));
        assert!(header.contains("Point Index"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn empty_store_exports_header_only() {
        let store = AccuracyStore::new_in_memory().unwrap();
        let csv = store.export_csv().unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
