//! Field-name resolution for uploaded records.
//!
//! Uploaded spreadsheets do not share a header convention; coordinate
//! columns are resolved through fixed alias tables checked in priority
//! order.

use serde_json::{Map, Value};

/// A parsed spreadsheet row: column name to cell value (string or number).
pub type RawRecord = Map<String, Value>;

/// Accepted latitude column names, in priority order.
pub const LATITUDE_ALIASES: [&str; 2] = ["Latitude", "lat"];

/// Accepted longitude column names, in priority order.
pub const LONGITUDE_ALIASES: [&str; 2] = ["Longitude", "lon"];

/// Resolve a coordinate value from a record, trying each alias in order.
///
/// A value resolves if it is a JSON number, or a string that parses as a
/// finite float after trimming. An alias whose value does not resolve
/// falls through to the next one.
pub fn resolve_coordinate(record: &RawRecord, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .find_map(|key| record.get(*key).and_then(parse_value))
}

fn parse_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(key: &str, value: Value) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert(key.to_string(), value);
        record
    }

    #[test]
    fn resolves_primary_alias_first() {
        let mut rec = record("Latitude", json!(12.5));
        rec.insert("lat".to_string(), json!(99.0));
        assert_eq!(resolve_coordinate(&rec, &LATITUDE_ALIASES), Some(12.5));
    }

    #[test]
    fn falls_back_to_abbreviated_alias() {
        let rec = record("lat", json!("47.61"));
        assert_eq!(resolve_coordinate(&rec, &LATITUDE_ALIASES), Some(47.61));
    }

    #[test]
    fn unresolvable_primary_falls_through() {
        let mut rec = record("Longitude", json!(""));
        rec.insert("lon".to_string(), json!(-122.33));
        assert_eq!(resolve_coordinate(&rec, &LONGITUDE_ALIASES), Some(-122.33));
    }

    #[test]
    fn garbage_values_do_not_resolve() {
        assert_eq!(
            resolve_coordinate(&record("Latitude", json!("north")), &LATITUDE_ALIASES),
            None
        );
        assert_eq!(
            resolve_coordinate(&record("Latitude", json!("NaN")), &LATITUDE_ALIASES),
            None
        );
        assert_eq!(
            resolve_coordinate(&record("Latitude", json!(null)), &LATITUDE_ALIASES),
            None
        );
        assert_eq!(resolve_coordinate(&RawRecord::new(), &LATITUDE_ALIASES), None);
    }

    #[test]
    fn numeric_strings_are_trimmed() {
        let rec = record("Latitude", json!("  -33.87 "));
        assert_eq!(resolve_coordinate(&rec, &LATITUDE_ALIASES), Some(-33.87));
    }
}
