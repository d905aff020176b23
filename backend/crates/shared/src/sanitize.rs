//! Input sanitizer.
//!
//! Strips query-operator characters (`$`, `{`, `}`) from every string that
//! enters through a body, query string or path segment. Applied before
//! validation so rules see the cleaned value.

use serde_json::{Map, Value};

const STRIPPED: [char; 3] = ['$', '{', '}'];

/// Remove every stripped character from `input`.
pub fn clean_str(input: &str) -> String {
    input.chars().filter(|c| !STRIPPED.contains(c)).collect()
}

/// Recursively clean object keys and string values.
///
/// When two keys collapse to the same cleaned key, the later one wins.
pub fn clean_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(clean_str(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(clean_value).collect()),
        Value::Object(map) => {
            let mut cleaned = Map::with_capacity(map.len());
            for (key, inner) in map {
                cleaned.insert(clean_str(&key), clean_value(inner));
            }
            Value::Object(cleaned)
        }
        other => other,
    }
}
