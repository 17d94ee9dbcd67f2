//! Normalizer module.
//!
//! Provides the `Normalizer` type, which validates raw JSON records against
//! a resolved schema, fills in defaults, and recurses into nested records.
//!
//! Normalization never fails. A record that is not an object or misses a
//! required field is dropped from arrays and becomes an empty entity on its
//! own; a field with the wrong type falls back to its default.

use crate::config::EngineConfig;
use crate::normalize::builder::{Entity, EntityBuilder};
use crate::normalize::context::FieldContext;
use crate::schema::{FieldDef, FieldDefault, FieldType, ResolvedSchema, SchemaRef, SchemaResolver};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Result of normalizing raw data: one entity or an ordered list.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    One(Entity),
    Many(Vec<Entity>),
}

impl Normalized {
    pub fn into_value(self) -> Value {
        match self {
            Normalized::One(entity) => Value::Object(entity),
            Normalized::Many(entities) => {
                Value::Array(entities.into_iter().map(Value::Object).collect())
            }
        }
    }

    /// The single entity, if this is not a list.
    pub fn as_one(&self) -> Option<&Entity> {
        match self {
            Normalized::One(entity) => Some(entity),
            Normalized::Many(_) => None,
        }
    }

    /// The entity list; a single entity yields an empty slice.
    pub fn as_many(&self) -> &[Entity] {
        match self {
            Normalized::One(_) => &[],
            Normalized::Many(entities) => entities,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Normalized::One(entity) => entity.is_empty(),
            Normalized::Many(entities) => entities.is_empty(),
        }
    }
}

/// Walks raw records against resolved schemas.
///
/// # Examples
///
/// ```rust
/// use hatchstat::normalize::{Normalized, Normalizer};
/// use hatchstat::schema::{FieldDef, SchemaRegistry, SchemaResolver, TypeDef};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let registry = SchemaRegistry::new().with_type("id", TypeDef::new()
///     .field("id", FieldDef::string().required())
///     .field("name", FieldDef::string().default_with(|ctx| json!(ctx.record_str("id")))));
/// let resolver = SchemaResolver::new(Arc::new(registry));
/// let normalizer = Normalizer::new(&resolver);
///
/// let out = normalizer.normalize(&json!([{}, {"id": "x"}, {"id": "x"}]), &"id".into(), None, None);
/// assert_eq!(out.into_value(), json!([{"id": "x", "name": "x"}]));
/// ```
pub struct Normalizer<'r> {
    resolver: &'r SchemaResolver,
    identity_field: String,
}

impl<'r> Normalizer<'r> {
    /// Create a normalizer deduplicating arrays by the `id` field.
    pub fn new(resolver: &'r SchemaResolver) -> Self {
        Self {
            resolver,
            identity_field: String::from("id"),
        }
    }

    pub fn from_config(resolver: &'r SchemaResolver, config: &EngineConfig) -> Self {
        Self::new(resolver).with_identity_field(config.identity_field.clone())
    }

    /// Deduplicate arrays by a different string field.
    pub fn with_identity_field(mut self, field: impl Into<String>) -> Self {
        self.identity_field = field.into();
        self
    }

    pub fn resolver(&self) -> &SchemaResolver {
        self.resolver
    }

    /// Normalize `data` against `schema`.
    ///
    /// # Arguments
    ///
    /// * `data` - An array of records, a single record, or anything else
    ///   (treated as an invalid single record)
    /// * `schema` - Type name or ordered list of type names
    /// * `parent` - Partially built parent entity, visible to computed defaults
    /// * `key` - Map key of this record when it is a child of a `map` field
    pub fn normalize(
        &self,
        data: &Value,
        schema: &SchemaRef,
        parent: Option<&Entity>,
        key: Option<&str>,
    ) -> Normalized {
        self.normalize_within(data, schema, parent, key, &[])
    }

    /// Normalize and convert back into a JSON value.
    pub fn normalize_value(&self, data: &Value, schema: &SchemaRef) -> Value {
        self.normalize(data, schema, None, None).into_value()
    }

    /// `seeding` lists the schemas whose defaults are being normalized on
    /// the current path; a default never re-enters one of them.
    fn normalize_within(
        &self,
        data: &Value,
        schema: &SchemaRef,
        parent: Option<&Entity>,
        key: Option<&str>,
        seeding: &[SchemaRef],
    ) -> Normalized {
        let resolved = self.resolver.resolve_like(schema);
        match data {
            Value::Array(items) => {
                Normalized::Many(self.normalize_array(&resolved, items, parent, seeding))
            }
            Value::Object(record) if is_valid(&resolved, record) => {
                Normalized::One(self.normalize_record(&resolved, record, parent, key, seeding))
            }
            Value::Object(_) => {
                tracing::debug!(?schema, "record failed required-field validation");
                Normalized::One(Entity::new())
            }
            _ => Normalized::One(Entity::new()),
        }
    }

    fn normalize_one(
        &self,
        data: &Value,
        schema: &SchemaRef,
        parent: Option<&Entity>,
        key: Option<&str>,
        seeding: &[SchemaRef],
    ) -> Entity {
        match self.normalize_within(data, schema, parent, key, seeding) {
            Normalized::One(entity) => entity,
            Normalized::Many(_) => Entity::new(),
        }
    }

    fn normalize_array(
        &self,
        schema: &ResolvedSchema,
        items: &[Value],
        parent: Option<&Entity>,
        seeding: &[SchemaRef],
    ) -> Vec<Entity> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let Value::Object(record) = item else {
                tracing::trace!(index, "non-object element dropped");
                continue;
            };
            if !is_valid(schema, record) {
                tracing::debug!(index, "element failed required-field validation");
                continue;
            }
            if let Some(id) = record.get(&self.identity_field).and_then(Value::as_str) {
                if !seen.insert(id) {
                    tracing::debug!(index, id, "duplicate identity dropped");
                    continue;
                }
            }
            out.push(self.normalize_record(schema, record, parent, None, seeding));
        }

        out
    }

    fn normalize_record(
        &self,
        schema: &ResolvedSchema,
        record: &Entity,
        parent: Option<&Entity>,
        key: Option<&str>,
        seeding: &[SchemaRef],
    ) -> Entity {
        let mut builder = EntityBuilder::new();

        for (field, def) in schema.iter() {
            if !def.applies_to(record) {
                continue;
            }

            let value = match record.get(field) {
                Some(raw) if def.field_type.matches(raw) => {
                    Some(self.normalize_present(def, raw, &builder, seeding))
                }
                // an array where an object belongs is a shape mismatch, not a missing value
                Some(Value::Array(_)) if def.field_type == FieldType::Object => {
                    Some(Value::Object(Map::new()))
                }
                _ => self.default_value(def, record, parent, key, &builder, seeding),
            };

            if let Some(value) = value {
                builder.insert(field, value);
            }
        }

        builder.finish()
    }

    /// Value phase: the raw value has the declared type.
    fn normalize_present(
        &self,
        def: &FieldDef,
        raw: &Value,
        builder: &EntityBuilder,
        seeding: &[SchemaRef],
    ) -> Value {
        match raw {
            Value::Array(items) => match (&def.schema, def.item_type) {
                (Some(schema), _) => self
                    .normalize_within(raw, schema, Some(builder.as_entity()), None, seeding)
                    .into_value(),
                (None, Some(item_type)) => Value::Array(dedup_primitives(items, item_type)),
                (None, None) => raw.clone(),
            },
            Value::Object(entries) => match &def.schema {
                Some(schema) if def.map => {
                    Value::Object(self.normalize_map(entries, schema, builder.as_entity(), seeding))
                }
                Some(schema) => Value::Object(self.normalize_one(
                    raw,
                    schema,
                    Some(builder.as_entity()),
                    None,
                    seeding,
                )),
                None => raw.clone(),
            },
            _ => raw.clone(),
        }
    }

    fn normalize_map(
        &self,
        entries: &Map<String, Value>,
        schema: &SchemaRef,
        parent: &Entity,
        seeding: &[SchemaRef],
    ) -> Entity {
        let mut mapped = Entity::new();
        for (key, child) in entries {
            if !child.is_object() {
                tracing::trace!(key = %key, "non-object map child dropped");
                continue;
            }
            let entity = self.normalize_one(child, schema, Some(parent), Some(key), seeding);
            mapped.insert(key.clone(), Value::Object(entity));
        }
        mapped
    }

    /// Default phase: the raw value is missing or has the wrong type.
    ///
    /// Nested defaults are normalized against their schema. A schema that
    /// is already seeding a default further up the path yields an empty
    /// value instead, so self-nesting types terminate.
    fn default_value(
        &self,
        def: &FieldDef,
        record: &Entity,
        parent: Option<&Entity>,
        key: Option<&str>,
        builder: &EntityBuilder,
        seeding: &[SchemaRef],
    ) -> Option<Value> {
        let default = match &def.default {
            Some(FieldDefault::Literal(value)) => Some(value.clone()),
            Some(computed @ FieldDefault::Computed(_)) => {
                let merged = builder.overlay(record);
                Some(computed.evaluate(&FieldContext::new(&merged, parent, key)))
            }
            None => None,
        };

        let Some(schema) = &def.schema else {
            return default;
        };

        let reentered = seeding.contains(schema);
        if reentered && matches!(def.field_type, FieldType::Array | FieldType::Object) {
            tracing::debug!(?schema, "recursive nested default stopped");
        }
        let mut nested = seeding.to_vec();
        nested.push(schema.clone());

        match def.field_type {
            FieldType::Array => Some(match default {
                Some(seed @ Value::Array(_)) if !reentered => self
                    .normalize_within(&seed, schema, Some(builder.as_entity()), None, &nested)
                    .into_value(),
                _ => Value::Array(Vec::new()),
            }),
            FieldType::Object if def.map || reentered => Some(Value::Object(Map::new())),
            FieldType::Object => {
                let seed = match default {
                    Some(seed @ Value::Object(_)) => seed,
                    _ => Value::Object(Map::new()),
                };
                Some(Value::Object(self.normalize_one(
                    &seed,
                    schema,
                    Some(builder.as_entity()),
                    None,
                    &nested,
                )))
            }
            _ => default,
        }
    }
}

/// A record is valid when every required field is present with its declared type.
fn is_valid(schema: &ResolvedSchema, record: &Entity) -> bool {
    schema
        .iter()
        .filter(|(_, def)| def.required)
        .all(|(field, def)| record.get(field).map_or(false, |v| def.field_type.matches(v)))
}

/// Keep elements of `item_type`, first occurrence wins.
fn dedup_primitives(items: &[Value], item_type: FieldType) -> Vec<Value> {
    let mut kept: Vec<Value> = Vec::new();
    for item in items {
        if item_type.matches(item) && !kept.iter().any(|k| same_primitive(k, item)) {
            kept.push(item.clone());
        }
    }
    kept
}

fn same_primitive(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}
