//! User document schema
//!
//! Users are listed newest first by `createDate`. Each user owns a
//! `Profiles` subcollection of free-form documents.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{read_bool, read_string, read_timestamp, Schema};
use crate::db::store::{server_timestamp, Fields, Timestamp};

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// Per-user app settings
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserSettings {
    #[serde(default)]
    pub language: String,

    #[serde(default, rename = "musicOnBG")]
    pub music_on_bg: bool,

    #[serde(default)]
    pub notifications: bool,
}

impl UserSettings {
    fn to_wire(&self) -> Value {
        let mut fields = Fields::new();
        fields.insert("language".into(), Value::String(self.language.clone()));
        fields.insert("musicOnBG".into(), Value::Bool(self.music_on_bg));
        fields.insert("notifications".into(), Value::Bool(self.notifications));
        Value::Object(fields)
    }

    fn from_wire(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(data)) => Self {
                language: read_string(data, "language"),
                music_on_bg: read_bool(data, "musicOnBG"),
                notifications: read_bool(data, "notifications"),
            },
            _ => Self::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserRecord {
    #[serde(default)]
    pub id: String,

    #[serde(default, rename = "activeSubscription")]
    pub active_subscription: bool,

    /// Set by the store at creation, never changed afterwards
    #[serde(default, rename = "createDate")]
    pub create_date: Option<Timestamp>,

    #[serde(default, rename = "isOpen")]
    pub is_open: bool,

    #[serde(default)]
    pub settings: UserSettings,

    #[serde(default, rename = "subscriptionEndDate")]
    pub subscription_end_date: Option<Timestamp>,
}

impl Schema for UserRecord {
    fn to_wire(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("activeSubscription".into(), Value::Bool(self.active_subscription));
        fields.insert(
            "createDate".into(),
            self.create_date
                .map(|ts| ts.to_wire())
                .unwrap_or_else(server_timestamp),
        );
        fields.insert("isOpen".into(), Value::Bool(self.is_open));
        fields.insert("settings".into(), self.settings.to_wire());
        fields.insert(
            "subscriptionEndDate".into(),
            self.subscription_end_date
                .map(|ts| ts.to_wire())
                .unwrap_or(Value::Null),
        );
        fields
    }

    fn from_wire(id: &str, data: &Fields) -> Self {
        Self {
            id: id.to_string(),
            active_subscription: read_bool(data, "activeSubscription"),
            create_date: read_timestamp(data, "createDate"),
            is_open: read_bool(data, "isOpen"),
            settings: UserSettings::from_wire(data.get("settings")),
            subscription_end_date: read_timestamp(data, "subscriptionEndDate"),
        }
    }
}

/// Keep an explicit `null` distinct from an absent field
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial user update. `createDate` is not patchable.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserPatch {
    #[serde(rename = "activeSubscription", skip_serializing_if = "Option::is_none")]
    pub active_subscription: Option<bool>,

    #[serde(rename = "isOpen", skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,

    /// Replaces the whole settings object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<UserSettings>,

    /// `Some(None)` clears the end date
    #[serde(
        rename = "subscriptionEndDate",
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub subscription_end_date: Option<Option<Timestamp>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::patch_fields;
    use crate::db::store::is_server_timestamp;
    use serde_json::json;

    #[test]
    fn test_from_wire_defaults_settings() {
        let data = match json!({ "isOpen": true, "settings": "broken" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let user = UserRecord::from_wire("u1", &data);
        assert_eq!(user.id, "u1");
        assert!(user.is_open);
        assert!(!user.active_subscription);
        assert_eq!(user.settings, UserSettings::default());
        assert_eq!(user.create_date, None);
        assert_eq!(user.subscription_end_date, None);
    }

    #[test]
    fn test_to_wire_shape() {
        let user = UserRecord {
            settings: UserSettings {
                language: "he".into(),
                music_on_bg: true,
                notifications: false,
            },
            ..Default::default()
        };
        let wire = user.to_wire();
        assert!(is_server_timestamp(&wire["createDate"]));
        assert_eq!(wire["subscriptionEndDate"], Value::Null);
        assert_eq!(
            wire["settings"],
            json!({ "language": "he", "musicOnBG": true, "notifications": false })
        );
    }

    #[test]
    fn test_patch_distinguishes_clear_from_absent() {
        let untouched = UserPatch {
            is_open: Some(false),
            ..Default::default()
        };
        assert_eq!(Value::Object(patch_fields(&untouched).unwrap()), json!({ "isOpen": false }));

        let cleared = UserPatch {
            subscription_end_date: Some(None),
            ..Default::default()
        };
        assert_eq!(
            Value::Object(patch_fields(&cleared).unwrap()),
            json!({ "subscriptionEndDate": null })
        );

        let parsed: UserPatch = serde_json::from_value(json!({ "subscriptionEndDate": null })).unwrap();
        assert_eq!(parsed.subscription_end_date, Some(None));
        let parsed: UserPatch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parsed.subscription_end_date, None);
    }
}
