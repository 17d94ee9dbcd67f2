//! The current dataset.
//!
//! A [`Dataset`] is an immutable snapshot of every normalized collection.
//! Callers build a new one on each refresh and swap it in; nothing here
//! holds state between refreshes.

use crate::catalog::{self, Binding};
use crate::normalize::{Entity, Normalized, Normalizer};
use crate::probability::{bounty_for_date, inject_pets};
use crate::stats::daily_perk_for;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Normalized collections keyed by collection name.
///
/// # Examples
///
/// ```rust
/// use hatchstat::catalog::{bindings, builtin_registry};
/// use hatchstat::dataset::Dataset;
/// use hatchstat::normalize::Normalizer;
/// use hatchstat::schema::SchemaResolver;
/// use serde_json::{json, Value};
/// use std::sync::Arc;
///
/// let resolver = SchemaResolver::new(Arc::new(builtin_registry()));
/// let normalizer = Normalizer::new(&resolver);
/// let Value::Object(raw) = json!({
///     "worlds": [{"id": "the-overworld"}, {"name": "no id"}]
/// }) else { unreachable!() };
///
/// let dataset = Dataset::refresh(&normalizer, &raw, &bindings());
/// assert_eq!(dataset.list("worlds").len(), 1);
/// assert_eq!(dataset.list("worlds")[0]["img"], "assets/images/worlds/the-overworld");
/// assert!(dataset.eggs().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    collections: HashMap<String, Normalized>,
}

impl Dataset {
    /// Normalize every bound collection of `raw`.
    ///
    /// A collection missing from `raw` normalizes like any other
    /// non-object input and yields an empty entity.
    pub fn refresh(normalizer: &Normalizer<'_>, raw: &Map<String, Value>, bindings: &[Binding]) -> Self {
        let mut collections = HashMap::with_capacity(bindings.len());
        for binding in bindings {
            let data = raw.get(binding.collection).unwrap_or(&Value::Null);
            if data.is_null() {
                tracing::debug!(collection = binding.collection, "collection missing from raw data");
            }
            let normalized = normalizer.normalize(data, &binding.schema, None, None);
            collections.insert(binding.collection.to_string(), normalized);
        }
        tracing::debug!(collections = collections.len(), "dataset refreshed");
        Self { collections }
    }

    pub fn get(&self, collection: &str) -> Option<&Normalized> {
        self.collections.get(collection)
    }

    /// A list collection; empty if missing or not a list.
    pub fn list(&self, collection: &str) -> &[Entity] {
        self.get(collection).map(Normalized::as_many).unwrap_or(&[])
    }

    /// A single-record collection; `None` if missing or a list.
    pub fn record(&self, collection: &str) -> Option<&Entity> {
        self.get(collection).and_then(Normalized::as_one)
    }

    pub fn eggs(&self) -> &[Entity] {
        self.list(catalog::EGGS)
    }

    pub fn worlds(&self) -> &[Entity] {
        self.list(catalog::WORLDS)
    }

    pub fn daily_perks(&self) -> Option<&Entity> {
        self.record(catalog::DAILY_PERKS)
    }

    pub fn index(&self) -> Option<&Entity> {
        self.record(catalog::INDEX)
    }

    pub fn mastery(&self) -> Option<&Entity> {
        self.record(catalog::MASTERY)
    }

    pub fn secret_bounty(&self) -> Option<&Entity> {
        self.record(catalog::SECRET_BOUNTY)
    }

    /// Collection names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.collections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Eggs with the rotating pets of `weekday` (0 is Sunday) and the
    /// secret bounty of `date_key` (`YYYYMMDD`) added.
    pub fn eggs_with_injected_pets(&self, weekday: u32, date_key: &str) -> Vec<Entity> {
        let perk_pets: Vec<Entity> = self
            .daily_perks()
            .and_then(|perks| daily_perk_for(perks, weekday))
            .and_then(|perk| perk.get("pets"))
            .and_then(Value::as_array)
            .map(|pets| pets.iter().filter_map(Value::as_object).cloned().collect())
            .unwrap_or_default();
        let bounty = self
            .secret_bounty()
            .and_then(|data| bounty_for_date(data, date_key));

        inject_pets(self.eggs(), &perk_pets, bounty)
    }
}
