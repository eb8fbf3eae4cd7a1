//! Shared utilities for Google API modules

use serde_json::Value;

/// Extract an array field from a JSON response, returning an empty vec if missing.
///
/// Google APIs return lists under varying field names ("items", "messages", "labels", "sheets").
pub fn extract_array(response: &Value, field: &str) -> Vec<Value> {
    response
        .get(field)
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}

/// Percent-encode one URL path segment (calendar ids contain `@`, ranges contain `!`).
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_array_missing_field() {
        assert!(extract_array(&json!({"kind": "x"}), "items").is_empty());
        assert_eq!(extract_array(&json!({"items": [1, 2]}), "items").len(), 2);
    }

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment("team@group.calendar.google.com"), "team%40group.calendar.google.com");
        assert_eq!(segment("'Q1 Plan'!A1:B2"), "%27Q1%20Plan%27%21A1%3AB2");
    }
}
