//! Value normalization for output cells

use super::item::{canonical_timestamp, RawItem, Scalar};
use serde_json::{Number, Value};

/// A value ready to be written into a flat record.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    /// Missing or unreachable value.
    Empty,
    Text(String),
    Number(Number),
    Bool(bool),
    /// A leaf that is itself a mapping or sequence, kept as JSON.
    Structured(Value),
}

/// Normalize a resolved value. `None` means the lookup found nothing.
pub fn normalize(value: Option<&RawItem>) -> OutputValue {
    let Some(value) = value else {
        return OutputValue::Empty;
    };

    match value {
        RawItem::Absent => OutputValue::Empty,
        RawItem::Scalar(scalar) => match scalar {
            Scalar::Null => OutputValue::Empty,
            Scalar::Bool(b) => OutputValue::Bool(*b),
            Scalar::Number(n) => OutputValue::Number(n.clone()),
            Scalar::Text(s) => OutputValue::Text(s.clone()),
            Scalar::Timestamp(ts) => OutputValue::Text(canonical_timestamp(ts)),
        },
        RawItem::Mapping(_) | RawItem::Sequence(_) => OutputValue::Structured(value.to_json()),
    }
}

impl OutputValue {
    /// Render as a CSV cell.
    pub fn to_cell(&self) -> String {
        match self {
            OutputValue::Empty => String::new(),
            OutputValue::Text(s) => s.clone(),
            OutputValue::Number(n) => n.to_string(),
            OutputValue::Bool(true) => "True".to_string(),
            OutputValue::Bool(false) => "False".to_string(),
            OutputValue::Structured(v) => v.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, OutputValue::Empty)
    }
}

impl From<&OutputValue> for RawItem {
    fn from(value: &OutputValue) -> Self {
        match value {
            OutputValue::Empty => RawItem::Absent,
            OutputValue::Text(s) => RawItem::Scalar(Scalar::Text(s.clone())),
            OutputValue::Number(n) => RawItem::Scalar(Scalar::Number(n.clone())),
            OutputValue::Bool(b) => RawItem::Scalar(Scalar::Bool(*b)),
            OutputValue::Structured(v) => RawItem::from(v.clone()),
        }
    }
}

impl From<&str> for OutputValue {
    fn from(s: &str) -> Self {
        OutputValue::Text(s.to_string())
    }
}
