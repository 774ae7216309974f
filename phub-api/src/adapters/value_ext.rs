//! Tolerant lookup helpers over generic JSON trees
//!
//! Source payloads omit, relocate, and retype fields across vintages, so every
//! helper here degrades to absent instead of failing. Adapters compose these
//! into ordered "try key A, else key B, else absent" chains per field.

use serde_json::Value;

/// Stand-in for an absent subtree, so adapters can keep borrowing
pub(crate) static NULL: Value = Value::Null;

/// Object member lookup; `None` unless `value` is an object carrying `key`
pub(crate) fn get<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|map| map.get(key))
}

/// Walk a chain of object keys
pub(crate) fn get_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| get(current, *key))
}

/// Loose presence check: null, empty strings, empty arrays and empty objects
/// count as absent
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Non-empty string at `key`
pub(crate) fn str_member(value: &Value, key: &str) -> Option<String> {
    get(value, key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Number at `key`; numeric strings are accepted, anything else is absent
pub(crate) fn f64_member(value: &Value, key: &str) -> Option<f64> {
    match get(value, key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Array members at `key`; absent or non-array yields an empty slice
pub(crate) fn array_member<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    get(value, key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
