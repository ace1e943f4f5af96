//! Word document schema
//!
//! Besides the converter this holds the row shapes used for bulk import and
//! export, and the console's client-side word filter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{number_to_u64, read_string, read_string_list, read_timestamp, read_u64, Schema};
use crate::db::store::{server_timestamp, Fields, Timestamp};

/// Collection name for words
pub const WORD_COLLECTION: &str = "words";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Word {
    #[serde(default)]
    pub id: String,

    pub title_en: String,
    pub title_he: String,

    /// Free-text tags, order preserved
    #[serde(default)]
    pub category: Vec<String>,

    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub corr_img: String,

    #[serde(default)]
    pub voice_record_en: String,
    #[serde(default)]
    pub voice_record_he: String,

    /// Manual ordering within tests
    #[serde(default)]
    pub test_order_id: u64,

    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Word {
    pub fn new(title_en: impl Into<String>, title_he: impl Into<String>) -> Self {
        Self {
            title_en: title_en.into(),
            title_he: title_he.into(),
            ..Default::default()
        }
    }

    /// Build from a parsed import row.
    ///
    /// Returns the row's id (when non-empty) alongside the normalized word.
    pub fn from_import_row(row: &Fields) -> (Option<String>, Self) {
        let id = row.get("id").and_then(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let word = Self {
            id: String::new(),
            title_en: read_string(row, "title_en"),
            title_he: read_string(row, "title_he"),
            category: normalize_category(row.get("category")),
            img: read_string(row, "img"),
            corr_img: read_string(row, "corr_img"),
            voice_record_en: read_string(row, "voice_record_en"),
            voice_record_he: read_string(row, "voice_record_he"),
            test_order_id: parse_order_id(row.get("test_order_id")),
            created_at: None,
        };
        (id, word)
    }

    /// Flat row for export; tags are joined with `,`
    pub fn to_export_row(&self) -> Fields {
        let mut row = Fields::new();
        row.insert("id".into(), Value::String(self.id.clone()));
        row.insert("title_en".into(), Value::String(self.title_en.clone()));
        row.insert("title_he".into(), Value::String(self.title_he.clone()));
        row.insert("category".into(), Value::String(self.category.join(",")));
        row.insert("img".into(), Value::String(self.img.clone()));
        row.insert("corr_img".into(), Value::String(self.corr_img.clone()));
        row.insert("voice_record_en".into(), Value::String(self.voice_record_en.clone()));
        row.insert("voice_record_he".into(), Value::String(self.voice_record_he.clone()));
        row.insert("test_order_id".into(), Value::from(self.test_order_id));
        row
    }

    /// Patch carrying every declared field except `created_at`
    pub fn to_patch(&self) -> WordPatch {
        WordPatch {
            title_en: Some(self.title_en.clone()),
            title_he: Some(self.title_he.clone()),
            category: Some(self.category.clone()),
            img: Some(self.img.clone()),
            corr_img: Some(self.corr_img.clone()),
            voice_record_en: Some(self.voice_record_en.clone()),
            voice_record_he: Some(self.voice_record_he.clone()),
            test_order_id: Some(self.test_order_id),
            created_at: None,
        }
    }
}

/// Tags from an import cell: arrays map element-wise, strings split on `,`
pub fn normalize_category(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_order_id(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => number_to_u64(n),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| *f >= 0.0)
            .map(|f| f as u64)
            .unwrap_or(0),
        _ => 0,
    }
}

impl Schema for Word {
    fn to_wire(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("title_en".into(), Value::String(self.title_en.clone()));
        fields.insert("title_he".into(), Value::String(self.title_he.clone()));
        fields.insert(
            "category".into(),
            Value::Array(self.category.iter().cloned().map(Value::String).collect()),
        );
        fields.insert("img".into(), Value::String(self.img.clone()));
        fields.insert("corr_img".into(), Value::String(self.corr_img.clone()));
        fields.insert("voice_record_en".into(), Value::String(self.voice_record_en.clone()));
        fields.insert("voice_record_he".into(), Value::String(self.voice_record_he.clone()));
        fields.insert("test_order_id".into(), Value::from(self.test_order_id));
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
            title_en: read_string(data, "title_en"),
            title_he: read_string(data, "title_he"),
            category: read_string_list(data, "category"),
            img: read_string(data, "img"),
            corr_img: read_string(data, "corr_img"),
            voice_record_en: read_string(data, "voice_record_en"),
            voice_record_he: read_string(data, "voice_record_he"),
            test_order_id: read_u64(data, "test_order_id"),
            created_at: read_timestamp(data, "created_at"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_he: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corr_img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_record_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_record_he: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// Case-insensitive search over fetched words
#[derive(Clone, Debug, Default)]
pub struct WordFilter {
    /// Matched against both titles
    pub search: String,
    /// Matched against any tag
    pub category: String,
}

impl WordFilter {
    pub fn matches(&self, word: &Word) -> bool {
        let search = self.search.to_lowercase();
        let matches_search = word.title_en.to_lowercase().contains(&search)
            || word.title_he.to_lowercase().contains(&search);

        let category = self.category.to_lowercase();
        let matches_category = category.is_empty()
            || word
                .category
                .iter()
                .any(|tag| tag.to_lowercase().contains(&category));

        matches_search && matches_category
    }

    pub fn apply<'a>(&'a self, words: &'a [Word]) -> impl Iterator<Item = &'a Word> + 'a {
        words.iter().filter(move |word| self.matches(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_wire_fills_defaults() {
        let word = Word::from_wire("w1", &fields(json!({ "title_en": "dog" })));
        assert_eq!(word.id, "w1");
        assert_eq!(word.title_en, "dog");
        assert_eq!(word.title_he, "");
        assert!(word.category.is_empty());
        assert_eq!(word.test_order_id, 0);
        assert_eq!(word.created_at, None);
    }

    #[test]
    fn test_to_wire_projects_declared_fields() {
        let mut word = Word::new("cat", "חתול");
        word.id = "ignored".into();
        word.category = vec!["animals".into(), "pets".into()];
        word.test_order_id = 4;

        let wire = word.to_wire();
        assert_eq!(wire.len(), 9);
        assert!(!wire.contains_key("id"));
        assert_eq!(wire["category"], json!(["animals", "pets"]));
        assert_eq!(wire["test_order_id"], json!(4));
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(
            normalize_category(Some(&json!(" animals, pets ,,farm "))),
            vec!["animals", "pets", "farm"]
        );
        assert_eq!(normalize_category(Some(&json!(["a", 2]))), vec!["a", "2"]);
        assert!(normalize_category(Some(&json!(7))).is_empty());
        assert!(normalize_category(None).is_empty());
    }

    #[test]
    fn test_import_row_normalization() {
        let (id, word) = Word::from_import_row(&fields(json!({
            "id": "  ",
            "title_en": "sun",
            "category": "sky,nature",
            "test_order_id": "12",
        })));
        assert_eq!(id, None);
        assert_eq!(word.title_en, "sun");
        assert_eq!(word.title_he, "");
        assert_eq!(word.category, vec!["sky", "nature"]);
        assert_eq!(word.test_order_id, 12);

        let (id, word) = Word::from_import_row(&fields(json!({ "id": "abc", "test_order_id": "x" })));
        assert_eq!(id.as_deref(), Some("abc"));
        assert_eq!(word.test_order_id, 0);
    }

    #[test]
    fn test_export_row_joins_tags() {
        let mut word = Word::new("moon", "ירח");
        word.id = "m1".into();
        word.category = vec!["sky".into(), "night".into()];
        let row = word.to_export_row();
        assert_eq!(row["id"], json!("m1"));
        assert_eq!(row["category"], json!("sky,night"));

        // Export feeds straight back into import
        let (id, back) = Word::from_import_row(&row);
        assert_eq!(id.as_deref(), Some("m1"));
        assert_eq!(back.category, word.category);
    }

    #[test]
    fn test_filter() {
        let mut apple = Word::new("Apple", "תפוח");
        apple.category = vec!["Fruits".into()];
        let mut car = Word::new("Car", "מכונית");
        car.category = vec!["Vehicles".into()];
        let words = vec![apple, car];

        let by_title = WordFilter {
            search: "app".into(),
            ..Default::default()
        };
        assert_eq!(by_title.apply(&words).count(), 1);

        let by_tag = WordFilter {
            category: "vehic".into(),
            ..Default::default()
        };
        let found: Vec<&Word> = by_tag.apply(&words).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title_en, "Car");

        assert_eq!(WordFilter::default().apply(&words).count(), 2);
    }
}
