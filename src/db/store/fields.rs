//! Field-level write semantics shared by every backend
//!
//! - server timestamp markers, resolved at commit
//! - deep merge for `set` in merge mode
//! - dotted-path partial update for `update`

use serde_json::{Map, Value};

use super::Fields;

/// Key of the marker object standing in for "commit time"
pub const SERVER_TIMESTAMP_KEY: &str = "$serverTimestamp";

/// Marker value resolved to the commit wall-clock time by the store
pub fn server_timestamp() -> Value {
    let mut marker = Map::new();
    marker.insert(SERVER_TIMESTAMP_KEY.to_string(), Value::Bool(true));
    Value::Object(marker)
}

pub fn is_server_timestamp(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.len() == 1 && map.get(SERVER_TIMESTAMP_KEY) == Some(&Value::Bool(true)),
        _ => false,
    }
}

/// Replace every marker, at any depth, with `now`
pub(crate) fn resolve_sentinels(fields: &mut Fields, now: &Value) {
    for value in fields.values_mut() {
        resolve_value(value, now);
    }
}

fn resolve_value(value: &mut Value, now: &Value) {
    if is_server_timestamp(value) {
        *value = now.clone();
        return;
    }
    match value {
        Value::Object(map) => resolve_sentinels(map, now),
        Value::Array(items) => {
            for item in items {
                resolve_value(item, now);
            }
        }
        _ => {}
    }
}

/// Deep merge: nested objects merge key by key, everything else replaces
pub(crate) fn merge_deep(target: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_deep(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Partial update: each key is a dotted field path and replaces only that field
pub(crate) fn apply_update(target: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        let mut parts: Vec<&str> = key.split('.').collect();
        let leaf = parts.pop().unwrap_or_default();

        let mut current = &mut *target;
        for part in parts {
            let slot = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made an object"),
            };
        }
        current.insert(leaf.to_string(), value);
    }
}

/// Look up a possibly dotted field path
pub fn field_value<'a>(fields: &'a Fields, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut current = fields.get(first)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}
