//! Match-record decoding.
//!
//! Turns raw JSON into a [`MatchRecord`]. Only top-level problems are errors:
//! invalid JSON is [`RecordError::DecodeError`], and a document that decodes to
//! `null`, `{}` or `[]` is [`RecordError::EmptyRecord`].

use serde_json::Value;
use std::path::Path;

use crate::error::{RecordError, RecordResult};
use crate::models::MatchRecord;

/// Returns true when a decoded document carries no data at all.
fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Decode a match record from a JSON string.
///
/// # Example
/// ```
/// use ipl_etl::parse_match_str;
///
/// let record = parse_match_str(r#"{"info": {"teams": ["A", "B"]}, "innings": []}"#).unwrap();
/// assert_eq!(record.info.teams, vec!["A", "B"]);
/// ```
pub fn parse_match_str(content: &str) -> RecordResult<MatchRecord> {
    parse_match_bytes(content.as_bytes())
}

/// Decode a match record from raw bytes.
pub fn parse_match_bytes(bytes: &[u8]) -> RecordResult<MatchRecord> {
    let value: Value = serde_json::from_slice(bytes)?;
    parse_match_value(value)
}

/// Decode a match record from an already-parsed JSON value.
pub fn parse_match_value(value: Value) -> RecordResult<MatchRecord> {
    if is_empty_document(&value) {
        return Err(RecordError::EmptyRecord);
    }
    if !value.is_object() {
        return Err(RecordError::DecodeError("expected a JSON object at top level".into()));
    }
    Ok(serde_json::from_value(value)?)
}

/// Read and decode a match file.
pub fn parse_match_file<P: AsRef<Path>>(path: P) -> RecordResult<MatchRecord> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_match_bytes(&bytes)
}
