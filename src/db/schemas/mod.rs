//! Typed records for the console's core collections
//!
//! Each record owns its converter: [`Schema::to_wire`] projects only the
//! declared fields (never the id) and [`Schema::from_wire`] rebuilds the
//! record with type-appropriate defaults for anything absent or malformed.

mod category;
mod user;
mod word;
mod world;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::db::store::{Fields, Timestamp};
use crate::error::StoreError;

pub use category::{Category, CategoryPatch, CATEGORY_COLLECTION};
pub use user::{UserPatch, UserRecord, UserSettings, USER_COLLECTION};
pub use word::{normalize_category, Word, WordFilter, WordPatch, WORD_COLLECTION};
pub use world::{World, WorldPatch, WORLD_COLLECTION};

/// A record with a fixed schema and a converter pair
pub trait Schema: Sized + Send + Sync {
    /// Wire projection of the declared fields.
    ///
    /// Used on create paths: an unset creation timestamp becomes a server
    /// timestamp marker.
    fn to_wire(&self) -> Fields;

    /// Rebuild from the document's own id and body
    fn from_wire(id: &str, data: &Fields) -> Self;
}

/// Serialize a partial payload, keeping only the fields that were set
pub(crate) fn patch_fields<P: Serialize>(patch: &P) -> Result<Fields, StoreError> {
    match serde_json::to_value(patch)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidArgument(format!(
            "patch must serialize to an object, got {}",
            other
        ))),
    }
}

// Wire readers: absent or mistyped values fall back to defaults.

pub(crate) fn read_string(data: &Fields, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

pub(crate) fn read_bool(data: &Fields, key: &str) -> bool {
    data.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Non-negative integer; floats are truncated, negatives become 0
pub(crate) fn read_u64(data: &Fields, key: &str) -> u64 {
    match data.get(key) {
        Some(Value::Number(n)) => number_to_u64(n),
        _ => 0,
    }
}

pub(crate) fn number_to_u64(n: &Number) -> u64 {
    n.as_u64()
        .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .unwrap_or(0)
}

pub(crate) fn read_string_list(data: &Fields, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn read_timestamp(data: &Fields, key: &str) -> Option<Timestamp> {
    data.get(key).and_then(Timestamp::from_wire)
}
