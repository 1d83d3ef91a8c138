//! Generic object-merge helpers
//!
//! Implements the merge used across the services with:
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (last wins)
//! - Scalars: override (last wins)

use serde_json::{Map, Value};

/// Deep merge two JSON values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (second wins entirely)
/// - Scalars: override (second wins)
/// - Null: override (null can override any value)
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        // Both objects: deep merge
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        // Arrays: REPLACE (no concatenation)
        (Value::Array(_), overlay @ Value::Array(_)) => overlay,

        // Scalars and any other case: overlay wins
        (_, overlay) => overlay,
    }
}

/// Merge any number of sources into one object, first to last.
///
/// Later sources win per leaf. Sources that are not objects (scalars,
/// arrays, null) are skipped without error, and zero sources yield an
/// empty map.
pub fn merge_all<I>(sources: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Value>,
{
    let merged = sources
        .into_iter()
        .filter(Value::is_object)
        .fold(Value::Object(Map::new()), deep_merge);
    match merged {
        Value::Object(map) => map,
        // The fold starts from an object and only sees objects.
        _ => Map::new(),
    }
}
