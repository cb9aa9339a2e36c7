//! Field projection into flat records

use super::item::RawItem;
use super::normalize::{normalize, OutputValue};
use super::path;
use super::registry::FieldSpec;

/// Column every record starts with.
pub const REGION_COLUMN: &str = "Region";

/// Ordered column name -> value mapping.
///
/// Inserting an existing column replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    entries: Vec<(String, OutputValue)>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str, value: OutputValue) {
        match self.entries.iter_mut().find(|(name, _)| name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&OutputValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, OutputValue)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (&'a str, OutputValue)>>(iter: I) -> Self {
        let mut record = FlatRecord::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

/// Project `item` through `fields`, prefixed with the region column.
pub fn project(item: &RawItem, fields: &[FieldSpec], region: &str) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.insert(REGION_COLUMN, OutputValue::Text(region.to_string()));

    for field in fields {
        let value = normalize(path::resolve_first(item, &field.source));
        record.insert(&field.target, value);
    }

    record
}
