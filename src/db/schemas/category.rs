//! Category document schema

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{read_string, read_timestamp, Schema};
use crate::db::store::{server_timestamp, Fields, Timestamp};

/// Collection name for categories
pub const CATEGORY_COLLECTION: &str = "categories";

/// Word category shown in the console
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Category {
    /// Document id, never written to the body
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Image URL, may be empty
    #[serde(default)]
    pub img: String,

    /// Set by the store at creation when left empty
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Category {
    pub fn new(name: impl Into<String>, img: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            img: img.into(),
            ..Default::default()
        }
    }
}

impl Schema for Category {
    fn to_wire(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".into(), Value::String(self.name.clone()));
        fields.insert("img".into(), Value::String(self.img.clone()));
        fields.insert(
            "created_at".into(),
            self.created_at
                .map(|ts| ts.to_wire())
                .unwrap_or_else(server_timestamp),
        );
        fields
    }

    fn from_wire(id: &str, data: &Fields) -> Self {
        Self {
            id: id.to_string(),
            name: read_string(data, "name"),
            img: read_string(data, "img"),
            created_at: read_timestamp(data, "created_at"),
        }
    }
}

/// Partial category update; unset fields are left untouched
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}
