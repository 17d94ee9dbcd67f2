//! Context handed to computed defaults.

use serde_json::{Map, Value};

/// Everything a computed default may look at.
///
/// `record` is the raw record overlaid with the fields normalized so far,
/// so a default can read siblings that precede it in the resolved schema.
/// `parent` is the partially built parent entity for nested records and
/// `key` is the map key for children of `map` fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub record: &'a Map<String, Value>,
    pub parent: Option<&'a Map<String, Value>>,
    pub key: Option<&'a str>,
}

impl<'a> FieldContext<'a> {
    pub fn new(
        record: &'a Map<String, Value>,
        parent: Option<&'a Map<String, Value>>,
        key: Option<&'a str>,
    ) -> Self {
        Self {
            record,
            parent,
            key,
        }
    }

    /// A non-empty string field of the record.
    pub fn record_str(&self, field: &str) -> Option<&'a str> {
        non_empty_str(self.record, field)
    }

    /// A non-empty string field of the parent, if there is a parent.
    pub fn parent_str(&self, field: &str) -> Option<&'a str> {
        self.parent.and_then(|parent| non_empty_str(parent, field))
    }
}

fn non_empty_str<'a>(map: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    map.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
