//! Per-item input/output model.
//!
//! Items are positional: index `i` is the caller's i-th input row, and every
//! result row is tagged with the index that produced it so the host can
//! correlate outputs even when the underlying call was per-batch.

use serde_json::{json, Map, Value};

/// One result row, correlated back to the input item that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputItem {
    pub index: usize,
    pub json: Value,
}

impl OutputItem {
    pub fn new(index: usize, json: Value) -> Self {
        Self { index, json }
    }

    /// An error row: the operation failed for this item but the run went on.
    pub fn from_error(index: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            index,
            json: json!({ "message": message }),
        }
    }

    /// `true` when this row reports a per-item failure.
    pub fn is_error(&self) -> bool {
        self.json.get("message").is_some() && self.json.get("id").is_none()
    }
}

/// Merge a record's nested `customFields` into the top level of the row.
/// Custom fields win on name collisions.
pub fn flatten_custom_fields(record: Value) -> Value {
    match record {
        Value::Object(mut map) => {
            if let Some(Value::Object(custom)) = map.remove("customFields") {
                for (key, value) in custom {
                    map.insert(key, value);
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Drop the named fields from a payload before submission.
pub fn remove_ignored_fields(
    fields: Map<String, Value>,
    ignore: &[String],
) -> Map<String, Value> {
    if ignore.is_empty() {
        return fields;
    }
    fields
        .into_iter()
        .filter(|(key, _)| !ignore.contains(key))
        .collect()
}
