//! Raw provider items
//!
//! Provider responses are arbitrary nested structures. They are modelled as a
//! tagged variant so every traversal step has to say what it does with a
//! mapping, a sequence, a scalar, or a missing value.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// A nested value returned by a provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum RawItem {
    Mapping(BTreeMap<String, RawItem>),
    Sequence(Vec<RawItem>),
    Scalar(Scalar),
    /// A value that does not exist (failed lookup, nothing stored yet).
    Absent,
}

/// Leaf values of a [`RawItem`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Timestamp(DateTime<FixedOffset>),
}

impl RawItem {
    /// Convert a provider response, promoting RFC 3339 strings to timestamps.
    pub fn from_response(value: Value) -> Self {
        match value {
            Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(ts) => RawItem::Scalar(Scalar::Timestamp(ts)),
                Err(_) => RawItem::Scalar(Scalar::Text(s)),
            },
            Value::Array(arr) => {
                RawItem::Sequence(arr.into_iter().map(RawItem::from_response).collect())
            }
            Value::Object(map) => RawItem::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, RawItem::from_response(v)))
                    .collect(),
            ),
            other => RawItem::from(other),
        }
    }

    /// Key lookup; `None` for missing keys and for anything that is not a mapping.
    pub fn get(&self, key: &str) -> Option<&RawItem> {
        match self {
            RawItem::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawItem::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RawItem::Absent)
    }

    /// Falsiness used when deciding whether a primary response holds anything.
    pub fn is_truthy(&self) -> bool {
        match self {
            RawItem::Absent => false,
            RawItem::Mapping(map) => !map.is_empty(),
            RawItem::Sequence(seq) => !seq.is_empty(),
            RawItem::Scalar(scalar) => match scalar {
                Scalar::Null => false,
                Scalar::Bool(b) => *b,
                Scalar::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
                Scalar::Text(s) => !s.is_empty(),
                Scalar::Timestamp(_) => true,
            },
        }
    }

    /// Render as JSON for passing back to a provider call.
    pub fn to_json(&self) -> Value {
        match self {
            RawItem::Absent => Value::Null,
            RawItem::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            RawItem::Sequence(seq) => Value::Array(seq.iter().map(RawItem::to_json).collect()),
            RawItem::Scalar(scalar) => scalar.to_json(),
        }
    }
}

impl Scalar {
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::Text(s) => Value::String(s.clone()),
            Scalar::Timestamp(ts) => Value::String(canonical_timestamp(ts)),
        }
    }
}

/// ISO-8601 text with an explicit offset, fractional seconds only when present.
pub fn canonical_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

impl From<Value> for RawItem {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawItem::Scalar(Scalar::Null),
            Value::Bool(b) => RawItem::Scalar(Scalar::Bool(b)),
            Value::Number(n) => RawItem::Scalar(Scalar::Number(n)),
            Value::String(s) => RawItem::Scalar(Scalar::Text(s)),
            Value::Array(arr) => RawItem::Sequence(arr.into_iter().map(RawItem::from).collect()),
            Value::Object(map) => {
                RawItem::Mapping(map.into_iter().map(|(k, v)| (k, RawItem::from(v))).collect())
            }
        }
    }
}

impl From<&str> for RawItem {
    fn from(s: &str) -> Self {
        RawItem::Scalar(Scalar::Text(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response_promotes_timestamps() {
        let item = RawItem::from_response(json!({
            "LaunchTime": "2023-01-15T10:30:00.000Z",
            "Name": "web-1"
        }));

        assert!(matches!(
            item.get("LaunchTime"),
            Some(RawItem::Scalar(Scalar::Timestamp(_)))
        ));
        assert_eq!(item.get("Name").and_then(RawItem::as_str), Some("web-1"));
    }

    #[test]
    fn test_plain_conversion_keeps_text() {
        let item = RawItem::from(json!("2023-01-15T10:30:00Z"));
        assert_eq!(item.as_str(), Some("2023-01-15T10:30:00Z"));
    }

    #[test]
    fn test_get_on_non_mapping() {
        let item = RawItem::from(json!([1, 2]));
        assert!(item.get("a").is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(!RawItem::Absent.is_truthy());
        assert!(!RawItem::from(json!(null)).is_truthy());
        assert!(!RawItem::from(json!("")).is_truthy());
        assert!(!RawItem::from(json!(0)).is_truthy());
        assert!(!RawItem::from(json!({})).is_truthy());
        assert!(!RawItem::from(json!([])).is_truthy());
        assert!(RawItem::from(json!("x")).is_truthy());
        assert!(RawItem::from(json!({"a": 1})).is_truthy());
    }

    #[test]
    fn test_to_json_roundtrips_structure() {
        let value = json!({"a": [1, "b", true, null], "c": {"d": 2.5}});
        assert_eq!(RawItem::from(value.clone()).to_json(), value);
    }

    #[test]
    fn test_timestamp_to_json_is_canonical() {
        let item = RawItem::from_response(json!("2023-01-15T10:30:00Z"));
        assert_eq!(item.to_json(), json!("2023-01-15T10:30:00+00:00"));
    }
}
