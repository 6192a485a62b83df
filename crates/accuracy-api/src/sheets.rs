//! Spreadsheet parsing: uploaded workbook bytes to raw records.
//!
//! First worksheet only; the first row is the header row and every
//! following row becomes one record keyed by header name. Cell-level type
//! handling stops here — coordinate resolution is the engine's job.

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use serde_json::Value;

use accuracy_engine::RawRecord;

use crate::error::ApiError;

/// Parse workbook bytes (xlsx/xls/ods) into records.
///
/// # Errors
///
/// [`ApiError::Spreadsheet`] when the bytes are not a readable workbook or
/// the workbook has no sheets.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<RawRecord>, ApiError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ApiError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ApiError::Spreadsheet("workbook has no sheets".to_string()))?
        .map_err(|e| ApiError::Spreadsheet(e.to_string()))?;

    Ok(range_to_records(&range))
}

/// Convert a sheet range into records using the first row as headers.
pub(crate) fn range_to_records(range: &Range<Data>) -> Vec<RawRecord> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(ToString::to_string).collect();

    rows.map(|row| {
        let mut record = RawRecord::new();
        for (header, cell) in headers.iter().zip(row) {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = cell_to_value(cell) {
                record.insert(header.clone(), value);
            }
        }
        record
    })
    .collect()
}

fn cell_to_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::Float(f) => Some(Value::from(*f)),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Bool(b) => Some(Value::from(*b)),
        other => Some(Value::String(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("Latitude".to_string()));
        range.set_value((0, 1), Data::String("Longitude".to_string()));
        range.set_value((1, 0), Data::Float(10.0));
        range.set_value((1, 1), Data::Float(20.0));
        range.set_value((2, 0), Data::String("10.001".to_string()));
        range.set_value((2, 1), Data::Float(20.0));
        range
    }

    #[test]
    fn header_row_names_record_fields() {
        let records = range_to_records(&coordinate_range());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Latitude"].as_f64(), Some(10.0));
        assert_eq!(records[0]["Longitude"].as_f64(), Some(20.0));
        // Text cells stay strings; the engine parses them later.
        assert_eq!(records[1]["Latitude"].as_str(), Some("10.001"));
    }

    #[test]
    fn empty_cells_are_omitted() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("Latitude".to_string()));
        range.set_value((0, 1), Data::String("Longitude".to_string()));
        range.set_value((1, 0), Data::Float(45.0));

        let records = range_to_records(&range);
        assert_eq!(records.len(), 1);
        assert!(records[0].contains_key("Latitude"));
        assert!(!records[0].contains_key("Longitude"));
    }

    #[test]
    fn headerless_range_yields_no_records() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_records(&range).is_empty());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = parse_workbook(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, ApiError::Spreadsheet(_)));
    }
}
