//! DuckDB-backed store for accuracy entries and their point rows.

use chrono::{DateTime, Utc};
use duckdb::{Connection, params};
use std::path::Path;
use tracing::debug;

use accuracy_domain::{Entry, EntryPage, MetricsSummary, NewEntry, StoredPoint};

use crate::error::{Result, StoreError};

/// Relational store for accuracy-assessment results.
///
/// Owns a single DuckDB connection; callers serialize access (the API
/// layer holds the store behind an async mutex and takes one guard per
/// operation).
pub struct AccuracyStore {
    pub(crate) conn: Connection,
}

impl AccuracyStore {
    /// Create a store on an in-memory database.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened or the schema cannot be
    /// initialized.
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create a store with persistent file-backed storage.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened or the schema cannot be
    /// initialized.
    pub fn new_persistent<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the schema. Idempotent.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE SEQUENCE IF NOT EXISTS entries_id_seq;

            -- Assessment summary rows
            CREATE TABLE IF NOT EXISTS entries (
                id BIGINT PRIMARY KEY DEFAULT nextval('entries_id_seq'),
                file1_name VARCHAR NOT NULL,
                file2_name VARCHAR NOT NULL,
                created_at VARCHAR NOT NULL,
                mean_positional_uncertainty DOUBLE NOT NULL,
                standard_deviation DOUBLE NOT NULL,
                ce90 DOUBLE NOT NULL,
                mean_positional_uncertainty_no_outliers DOUBLE NOT NULL,
                standard_deviation_no_outliers DOUBLE NOT NULL,
                ce90_no_outliers DOUBLE NOT NULL
            );

            -- Per-pair point rows, 1-based index in upload order
            CREATE TABLE IF NOT EXISTS points (
                entry_id BIGINT NOT NULL,
                point_index INTEGER NOT NULL,
                lat1 DOUBLE NOT NULL,
                lon1 DOUBLE NOT NULL,
                lat2 DOUBLE NOT NULL,
                lon2 DOUBLE NOT NULL,
                distance DOUBLE NOT NULL,
                is_outlier BOOLEAN NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_points_entry ON points(entry_id);
            CREATE INDEX IF NOT EXISTS idx_entries_created ON entries(created_at);
            "#,
        )?;
        Ok(())
    }

    /// Persist a computed assessment: the summary row plus one row per
    /// pair. Returns the new entry id.
    ///
    /// # Errors
    ///
    /// Any failed insert surfaces as [`StoreError::DuckDb`].
    pub fn insert_entry(&self, entry: &NewEntry) -> Result<i64> {
        let id: i64 = self.conn.query_row(
            r#"
            INSERT INTO entries (
                file1_name,
                file2_name,
                created_at,
                mean_positional_uncertainty,
                standard_deviation,
                ce90,
                mean_positional_uncertainty_no_outliers,
                standard_deviation_no_outliers,
                ce90_no_outliers
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
            params![
                entry.file1_name,
                entry.file2_name,
                entry.created_at.to_rfc3339(),
                entry.all_metrics.mean,
                entry.all_metrics.std_dev,
                entry.all_metrics.ce90,
                entry.non_outlier_metrics.mean,
                entry.non_outlier_metrics.std_dev,
                entry.non_outlier_metrics.ce90,
            ],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            r#"
            INSERT INTO points (entry_id, point_index, lat1, lon1, lat2, lon2, distance, is_outlier)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )?;
        for (i, point) in entry.points.iter().enumerate() {
            stmt.execute(params![
                id,
                (i + 1) as i32,
                point.lat1,
                point.lon1,
                point.lat2,
                point.lon2,
                point.distance,
                point.is_outlier,
            ])?;
        }

        debug!(entry_id = id, points = entry.points.len(), "entry persisted");
        Ok(id)
    }

    /// One page of entries, newest first.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuckDb`] on query failure, [`StoreError::Conversion`]
    /// on a malformed stored timestamp.
    pub fn list_entries(&self, page: u32, page_size: u32) -> Result<EntryPage> {
        let total_entries: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;

        let offset = i64::from(page.saturating_sub(1)) * i64::from(page_size);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, file1_name, file2_name, created_at,
                   mean_positional_uncertainty, standard_deviation, ce90,
                   mean_positional_uncertainty_no_outliers,
                   standard_deviation_no_outliers, ce90_no_outliers
            FROM entries
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )?;
        let rows = stmt.query_map(params![i64::from(page_size), offset], |row| {
            Ok(EntryRow {
                id: row.get(0)?,
                file1_name: row.get(1)?,
                file2_name: row.get(2)?,
                created_at: row.get(3)?,
                all: (row.get(4)?, row.get(5)?, row.get(6)?),
                non_outlier: (row.get(7)?, row.get(8)?, row.get(9)?),
            })
        })?;

        let entries = rows
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(EntryRow::into_entry)
            .collect::<Result<Vec<_>>>()?;

        let total_pages = if total_entries == 0 {
            0
        } else {
            (total_entries + i64::from(page_size) - 1) / i64::from(page_size)
        };

        Ok(EntryPage {
            total_entries,
            total_pages,
            current_page: page,
            entries,
        })
    }

    /// Whether an entry with this id exists.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuckDb`] on query failure.
    pub fn entry_exists(&self, entry_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE id = ?",
            params![entry_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All point rows of one entry, ordered by point index.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuckDb`] on query failure.
    pub fn points_by_entry(&self, entry_id: i64) -> Result<Vec<StoredPoint>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT entry_id, point_index, lat1, lon1, lat2, lon2, distance, is_outlier
            FROM points
            WHERE entry_id = ?
            ORDER BY point_index
            "#,
        )?;
        let rows = stmt.query_map(params![entry_id], |row| {
            Ok(StoredPoint {
                entry_id: row.get(0)?,
                index: row.get(1)?,
                lat1: row.get(2)?,
                lon1: row.get(3)?,
                lat2: row.get(4)?,
                lon2: row.get(5)?,
                distance: row.get(6)?,
                is_outlier: row.get(7)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }
}

/// Raw entries row before timestamp conversion.
struct EntryRow {
    id: i64,
    file1_name: String,
    file2_name: String,
    created_at: String,
    all: (f64, f64, f64),
    non_outlier: (f64, f64, f64),
}

impl EntryRow {
    fn into_entry(self) -> Result<Entry> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::Conversion(format!("created_at: {e}")))?
            .with_timezone(&Utc);

        Ok(Entry {
            id: self.id,
            file1_name: self.file1_name,
            file2_name: self.file2_name,
            created_at,
            all_metrics: MetricsSummary {
                mean: self.all.0,
                std_dev: self.all.1,
                ce90: self.all.2,
            },
            non_outlier_metrics: MetricsSummary {
                mean: self.non_outlier.0,
                std_dev: self.non_outlier.1,
                ce90: self.non_outlier.2,
            },
        })
    }
}
