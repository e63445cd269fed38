//! Row-shaping helpers shared across providers.

use chrono::{DateTime, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Deserializes accumulated page rows into typed rows, dropping (and
/// logging) malformed entries instead of failing the unit.
pub(crate) fn parse_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Vec<T> {
    let total = rows.len();
    let parsed: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(error = %e, "dropping malformed row");
                None
            }
        })
        .collect();

    if parsed.len() < total {
        warn!(dropped = total - parsed.len(), total, "some rows were malformed");
    }
    parsed
}

/// Renders a JSON scalar as a string column value. Nulls stay null;
/// non-string scalars use their JSON rendering.
pub(crate) fn render_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parses an upstream "local" datetime into a timezone-free timestamp.
///
/// Offset-carrying values are normalized to UTC before dropping the
/// offset; offset-free values are taken as-is. Unparseable values become
/// null rather than failing the unit.
pub(crate) fn parse_local_naive(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
}
