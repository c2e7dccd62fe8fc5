//! Response envelopes
//!
//! Endpoints disagree on whether a list comes back bare or wrapped
//! (`{"data": [...]}`, `{"items": [...]}`, `{"calificaciones": [...]}`).

use serde_json::Value;

/// Envelope fields checked for a list, after any caller-supplied keys
pub const LIST_ENVELOPES: [&str; 3] = ["data", "items", "results"];

/// Envelope fields checked for a single record
pub const RECORD_ENVELOPES: [&str; 2] = ["data", "curso"];

/// Pull the record list out of a response.
///
/// `keys` are resource-specific field names tried before the generic
/// envelopes. Anything that is not a list degrades to an empty slice.
pub fn extract_list<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => {
            let lookup = |key: &str| -> Option<&'a [Value]> {
                match map.get(key) {
                    Some(Value::Array(items)) => Some(items.as_slice()),
                    Some(inner @ Value::Object(_)) => {
                        let nested = extract_list(inner, keys);
                        (!nested.is_empty()).then_some(nested)
                    }
                    _ => None,
                }
            };
            keys.iter()
                .find_map(|key| lookup(key))
                .or_else(|| LIST_ENVELOPES.iter().find_map(|key| lookup(key)))
                .unwrap_or(&[])
        }
        _ => &[],
    }
}

/// Unwrap a single record from a `{"data": {...}}` style envelope.
///
/// A record that carries its own id is returned as is.
pub fn unwrap_record(value: &Value) -> &Value {
    let Some(map) = value.as_object() else {
        return value;
    };
    if super::reference::ID_FIELDS
        .iter()
        .any(|field| map.contains_key(*field))
    {
        return value;
    }
    RECORD_ENVELOPES
        .iter()
        .find_map(|key| map.get(*key).filter(|inner| inner.is_object()))
        .unwrap_or(value)
}
