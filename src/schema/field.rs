//! Field definitions.
//!
//! A [`FieldDef`] describes one field of a type definition: its runtime
//! type, whether records must carry it, how to default it, and whether it
//! holds nested records. Definitions are built with chained methods:
//!
//! ```rust
//! use hatchstat::schema::{Condition, FieldDef, FieldType};
//!
//! let world = FieldDef::string()
//!     .default("the-overworld")
//!     .when(Condition::field_eq("type", "world"));
//!
//! let tags = FieldDef::array().default(Vec::<String>::new()).item_type(FieldType::String);
//! assert!(world.condition.is_some());
//! assert_eq!(tags.item_type, Some(FieldType::String));
//! ```

use crate::normalize::FieldContext;
use crate::schema::registry::SchemaRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Runtime type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    /// Check whether `value` has this runtime type.
    ///
    /// `null` never matches: it counts as a missing value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hatchstat::schema::FieldType;
    /// use serde_json::json;
    ///
    /// assert!(FieldType::Object.matches(&json!({})));
    /// assert!(!FieldType::Object.matches(&json!([])));
    /// assert!(!FieldType::Object.matches(&json!(null)));
    /// assert!(FieldType::Number.matches(&json!(1.5)));
    /// ```
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type ComputeFn = dyn Fn(&FieldContext<'_>) -> Value + Send + Sync;
type PredicateFn = dyn Fn(&Map<String, Value>) -> bool + Send + Sync;

/// How a missing or mistyped field gets its value.
#[derive(Clone)]
pub enum FieldDefault {
    /// A fixed value, cloned into every record that needs it.
    Literal(Value),
    /// A value computed from the record built so far, its parent and its key.
    Computed(Arc<ComputeFn>),
}

impl FieldDefault {
    /// Wrap a closure as a computed default.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&FieldContext<'_>) -> Value + Send + Sync + 'static,
    {
        FieldDefault::Computed(Arc::new(f))
    }

    /// Produce the default value for `ctx`.
    pub fn evaluate(&self, ctx: &FieldContext<'_>) -> Value {
        match self {
            FieldDefault::Literal(value) => value.clone(),
            FieldDefault::Computed(f) => f(ctx),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            FieldDefault::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Predicate over the raw record deciding whether a field exists at all.
#[derive(Clone)]
pub struct Condition {
    predicate: Arc<PredicateFn>,
    description: String,
}

impl Condition {
    /// Build a condition from an arbitrary predicate.
    pub fn new<F>(predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            description: description.into(),
        }
    }

    /// The field exists only when `record[field] == value`.
    pub fn field_eq(field: &str, value: impl Into<Value>) -> Self {
        let field = field.to_string();
        let value = value.into();
        let description = format!("{field} == {value}");
        Self::new(move |record| record.get(&field) == Some(&value), description)
    }

    /// The field exists unless `record[field] == value`.
    ///
    /// A record without `field` satisfies the condition.
    pub fn field_ne(field: &str, value: impl Into<Value>) -> Self {
        let field = field.to_string();
        let value = value.into();
        let description = format!("{field} != {value}");
        Self::new(move |record| record.get(&field) != Some(&value), description)
    }

    /// Evaluate against a raw record.
    pub fn holds(&self, record: &Map<String, Value>) -> bool {
        (self.predicate)(record)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition({})", self.description)
    }
}

/// Definition of one field in a type definition.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub field_type: FieldType,
    /// Records missing this field, or carrying it with the wrong type, fail validation.
    pub required: bool,
    pub default: Option<FieldDefault>,
    /// Nested type(s) for array elements, object values, or map children.
    pub schema: Option<SchemaRef>,
    /// For arrays without a nested schema: keep only primitives of this type, deduplicated.
    pub item_type: Option<FieldType>,
    /// For objects with a nested schema: treat the value as `key -> child record`.
    pub map: bool,
    pub condition: Option<Condition>,
}

impl FieldDef {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            default: None,
            schema: None,
            item_type: None,
            map: false,
            condition: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn array() -> Self {
        Self::new(FieldType::Array)
    }

    pub fn object() -> Self {
        Self::new(FieldType::Object)
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Use a literal default.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(FieldDefault::Literal(value.into()));
        self
    }

    /// Use a computed default.
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.default = Some(FieldDefault::computed(f));
        self
    }

    /// Normalize nested records against `schema`.
    pub fn schema(mut self, schema: impl Into<SchemaRef>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Keep only array elements of `item_type`, deduplicated.
    pub fn item_type(mut self, item_type: FieldType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    /// Treat an object value as `key -> child record`.
    pub fn map(mut self) -> Self {
        self.map = true;
        self
    }

    /// Include the field only when `condition` holds for the raw record.
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Whether the field should appear for `record`.
    pub fn applies_to(&self, record: &Map<String, Value>) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition.holds(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_field_type_matches() {
        assert!(FieldType::String.matches(&json!("x")));
        assert!(!FieldType::String.matches(&json!(1)));
        assert!(FieldType::Boolean.matches(&json!(false)));
        assert!(FieldType::Array.matches(&json!([1, 2])));
        assert!(!FieldType::Number.matches(&json!(null)));
    }

    #[test]
    fn test_field_type_serde_lowercase() {
        let parsed: FieldType = serde_json::from_str("\"boolean\"").unwrap();
        assert_eq!(parsed, FieldType::Boolean);
        assert_eq!(FieldType::Object.to_string(), "object");
    }

    #[test]
    fn test_condition_eq_and_ne() {
        let is_world = Condition::field_eq("type", "world");
        let not_infinity = Condition::field_ne("type", "infinity");

        let world = record(json!({"type": "world"}));
        let infinity = record(json!({"type": "infinity"}));
        let untyped = record(json!({}));

        assert!(is_world.holds(&world));
        assert!(!is_world.holds(&infinity));
        assert!(!is_world.holds(&untyped));

        assert!(not_infinity.holds(&world));
        assert!(!not_infinity.holds(&infinity));
        assert!(not_infinity.holds(&untyped));
        assert_eq!(not_infinity.description(), "type != \"infinity\"");
    }

    #[test]
    fn test_literal_default_evaluates_to_clone() {
        let def = FieldDef::number().default(3);
        let empty = Map::new();
        let ctx = FieldContext::new(&empty, None, None);
        let value = def.default.as_ref().map(|d| d.evaluate(&ctx));
        assert_eq!(value, Some(json!(3)));
    }

    #[test]
    fn test_builder_flags() {
        let def = FieldDef::object().schema("pet").map().required();
        assert!(def.required);
        assert!(def.map);
        assert_eq!(def.field_type, FieldType::Object);
        assert!(def.applies_to(&Map::new()));
    }
}
