//! Entity builder.

use serde_json::{Map, Value};

/// A normalized record.
pub type Entity = Map<String, Value>;

/// Accumulates normalized fields into a fresh entity.
///
/// The raw record is only ever read; the builder owns its output.
#[derive(Debug, Clone, Default)]
pub struct EntityBuilder {
    out: Entity,
}

impl EntityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, value: Value) {
        self.out.insert(field.to_string(), value);
    }

    /// Fields built so far.
    pub fn as_entity(&self) -> &Entity {
        &self.out
    }

    /// The raw record overlaid with the fields built so far.
    pub fn overlay(&self, record: &Entity) -> Entity {
        let mut merged = record.clone();
        for (field, value) in &self.out {
            merged.insert(field.clone(), value.clone());
        }
        merged
    }

    pub fn finish(self) -> Entity {
        self.out
    }
}
