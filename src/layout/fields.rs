//! Alias-aware field access over raw JSON records.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::model::temporal::normalize_json;
use crate::model::task::clamp_progress;

pub const START_KEYS: &[&str] = &["start", "startDate", "date", "when"];
pub const END_KEYS: &[&str] = &["end", "endDate", "until", "finish", "to"];
pub const NAME_KEYS: &[&str] = &["name", "title"];
pub const PARENT_KEYS: &[&str] = &["parentId", "parent_id", "parent", "taskId"];

/// First present, non-null value among `keys`.
pub fn field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find(|v| !v.is_null())
}

pub fn date_field(record: &Map<String, Value>, keys: &[&str]) -> Option<NaiveDateTime> {
    field(record, keys).and_then(normalize_json)
}

/// String-ish field: strings are trimmed, numbers are formatted.
pub fn text_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let text = match field(record, keys)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

pub fn bool_field(record: &Map<String, Value>, keys: &[&str]) -> bool {
    match field(record, keys) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "1" | "milestone"
        ),
        _ => false,
    }
}

/// Progress in percent. Accepts numbers and numeric strings (with or without `%`).
pub fn progress_field(record: &Map<String, Value>) -> f32 {
    let raw = match field(record, &["progress"]) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    clamp_progress(raw as f32)
}

/// List of ids from an array or a comma-separated string.
pub fn id_list_field(record: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match field(record, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn aliases_resolve_in_order() {
        let record = obj(json!({"startDate": null, "date": "2025-01-02", "when": "2030-01-01"}));
        let d = date_field(&record, START_KEYS).unwrap();
        assert_eq!(d.to_string(), "2025-01-02 00:00:00");
    }

    #[test]
    fn progress_accepts_strings_and_clamps() {
        assert_eq!(progress_field(&obj(json!({"progress": "45%"}))), 45.0);
        assert_eq!(progress_field(&obj(json!({"progress": 250}))), 100.0);
        assert_eq!(progress_field(&obj(json!({"progress": -3}))), 0.0);
        assert_eq!(progress_field(&obj(json!({}))), 0.0);
    }

    #[test]
    fn id_lists_split_strings() {
        assert_eq!(id_list_field(&obj(json!({"d": "a, b,,c"})), &["d"]), vec!["a", "b", "c"]);
        assert_eq!(id_list_field(&obj(json!({"d": ["x", 7]})), &["d"]), vec!["x", "7"]);
    }
}
