//! Loose coercions for stored field values.

use serde_json::Value;

/// Truthiness of a stored field value.
///
/// Stored data comes from forms and config files, so booleans may arrive
/// as numbers or strings. Anything else is false.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

/// A stored value rendered as plain text, without JSON string quoting.
pub(crate) fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
