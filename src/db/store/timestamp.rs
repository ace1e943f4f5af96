//! Wire timestamps
//!
//! Stored as RFC 3339 UTC strings with fixed microsecond precision, so the
//! store's lexical ordering of strings matches chronological ordering.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wrap a datetime, truncated to the wire precision
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(6))
    }

    /// Parse any RFC 3339 string
    pub fn parse(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
    }

    /// Canonical wire string
    pub fn to_wire_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn to_wire(&self) -> Value {
        Value::String(self.to_wire_string())
    }

    /// Read a wire value; anything that is not a timestamp string is `None`
    pub fn from_wire(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::parse)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_format_is_fixed_width() {
        let ts = Timestamp::from(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
        assert_eq!(ts.to_wire_string(), "2024-01-15T10:30:00.000000Z");
        assert_eq!(Timestamp::from_wire(&ts.to_wire()), Some(ts));
    }

    #[test]
    fn test_lexical_order_matches_chronological() {
        let earlier = Timestamp::from(Utc.with_ymd_and_hms(2024, 1, 15, 9, 59, 59).unwrap());
        let later = Timestamp::from(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
        assert!(earlier < later);
        assert!(earlier.to_wire_string() < later.to_wire_string());
    }

    #[test]
    fn test_non_timestamp_values_are_rejected() {
        assert_eq!(Timestamp::from_wire(&Value::Null), None);
        assert_eq!(Timestamp::from_wire(&serde_json::json!(12)), None);
        assert_eq!(Timestamp::from_wire(&serde_json::json!("yesterday")), None);
    }
}
