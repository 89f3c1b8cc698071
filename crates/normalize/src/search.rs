//! Loose lookups over untyped JSON.

use serde_json::Value;

/// Depth-first search for the first key whose name contains `key_part`
/// (case-insensitive). Returns that key's value.
///
/// This is a heuristic fallback for fields that moved between backend
/// revisions, not an exact lookup: keys are visited in insertion order and
/// each key's subtree is searched before its next sibling, so the first
/// match wins even when a "better" one exists elsewhere. Array elements are
/// searched in order.
pub fn deep_find_by_key<'a>(value: &'a Value, key_part: &str) -> Option<&'a Value> {
    let needle = key_part.to_lowercase();
    find_in(value, &needle)
}

fn find_in<'a>(value: &'a Value, needle: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key.to_lowercase().contains(needle) {
                    return Some(child);
                }
                if let Some(found) = find_in(child, needle) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(|item| find_in(item, needle)),
        _ => None,
    }
}

/// JavaScript-style truthiness: null, false, 0, NaN and "" are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0 && !x.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// True when a decoded payload carries an application-level error marker.
///
/// Such payloads are returned to callers but never cached.
pub fn signals_error(payload: &Value) -> bool {
    payload.get("error").is_some_and(is_truthy)
}

/// First member of `obj` among `keys` with a truthy value.
pub fn first_truthy<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|v| is_truthy(v))
}

/// Number, or numeric string.
pub fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|x| x.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        _ => None,
    }
}

/// Display text for a scalar; structured values are rendered as compact JSON.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
