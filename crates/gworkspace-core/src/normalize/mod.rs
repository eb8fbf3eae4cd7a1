//! Response Normalizer
//!
//! Pure functions from raw Google resources to minimal, stable projections.
//! Missing optional fields become empty values rather than errors, and every
//! extractor also accepts the projection's own field name, so normalizing a
//! projection returns it unchanged.

pub mod calendar;
pub mod files;
pub mod mail;

use serde_json::Value;

/// String at `key`, or empty.
pub(crate) fn text(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// First string found under any of `keys`, or empty.
pub(crate) fn first_text(raw: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// Strings of the array at `key`, skipping non-string entries.
pub(crate) fn string_list(raw: &Value, key: &str) -> Vec<String> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Elements of the array at `key`, or an empty slice.
pub(crate) fn items<'a>(raw: &'a Value, key: &str) -> &'a [Value] {
    raw.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
