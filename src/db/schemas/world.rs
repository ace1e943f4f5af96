//! World document schema
//!
//! Worlds are listed by `orderId` ascending; each world owns a `games`
//! subcollection of free-form documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{read_string, read_u64, Schema};
use crate::db::store::Fields;

/// Collection name for worlds
pub const WORLD_COLLECTION: &str = "worlds";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct World {
    #[serde(default)]
    pub id: String,

    pub title_en: String,
    pub title_he: String,

    #[serde(default)]
    pub img: String,

    /// Position in the world list
    #[serde(default, rename = "orderId")]
    pub order_id: u64,
}

impl World {
    pub fn new(title_en: impl Into<String>, title_he: impl Into<String>, order_id: u64) -> Self {
        Self {
            title_en: title_en.into(),
            title_he: title_he.into(),
            order_id,
            ..Default::default()
        }
    }
}

impl Schema for World {
    fn to_wire(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("img".into(), Value::String(self.img.clone()));
        fields.insert("orderId".into(), Value::from(self.order_id));
        fields.insert("title_en".into(), Value::String(self.title_en.clone()));
        fields.insert("title_he".into(), Value::String(self.title_he.clone()));
        fields
    }

    fn from_wire(id: &str, data: &Fields) -> Self {
        Self {
            id: id.to_string(),
            title_en: read_string(data, "title_en"),
            title_he: read_string(data, "title_he"),
            img: read_string(data, "img"),
            order_id: read_u64(data, "orderId"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WorldPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_he: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(rename = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
}
