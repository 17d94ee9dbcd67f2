//! Schema registry module.
//!
//! The registry maps type names to [`TypeDef`]s. It is built once, wrapped
//! in an `Arc`, and never mutated afterwards; everything downstream
//! (resolver cache, normalizer) relies on that.

use crate::error::SchemaError;
use crate::ident::TypeName;
use crate::schema::field::FieldDef;
use crate::schema::graph::SchemaGraph;
use std::collections::HashMap;

/// Reference to one type or an ordered list of types merged left to right.
///
/// # Examples
///
/// ```rust
/// use hatchstat::schema::SchemaRef;
///
/// let single: SchemaRef = "pet".into();
/// let merged: SchemaRef = ["stats", "id"].into();
/// assert_eq!(single.names().len(), 1);
/// assert_eq!(merged.names()[1].as_str(), "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaRef {
    One(TypeName),
    Many(Vec<TypeName>),
}

impl SchemaRef {
    /// All referenced names, in merge order.
    pub fn names(&self) -> &[TypeName] {
        match self {
            SchemaRef::One(name) => std::slice::from_ref(name),
            SchemaRef::Many(names) => names,
        }
    }
}

impl From<&str> for SchemaRef {
    fn from(name: &str) -> Self {
        SchemaRef::One(TypeName::new(name))
    }
}

impl From<TypeName> for SchemaRef {
    fn from(name: TypeName) -> Self {
        SchemaRef::One(name)
    }
}

impl From<Vec<TypeName>> for SchemaRef {
    fn from(names: Vec<TypeName>) -> Self {
        SchemaRef::Many(names)
    }
}

impl From<Vec<&str>> for SchemaRef {
    fn from(names: Vec<&str>) -> Self {
        SchemaRef::Many(names.into_iter().map(TypeName::new).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SchemaRef {
    fn from(names: [&str; N]) -> Self {
        SchemaRef::Many(names.iter().copied().map(TypeName::new).collect())
    }
}

/// A type definition: ordered own fields plus optional parents.
///
/// # Examples
///
/// ```rust
/// use hatchstat::schema::{FieldDef, TypeDef};
///
/// let egg = TypeDef::new()
///     .extends(["id", "img"])
///     .field("imageDir", FieldDef::string().default("eggs"))
///     .field("riftable", FieldDef::boolean().default(false));
///
/// assert_eq!(egg.parents().len(), 2);
/// assert_eq!(egg.fields().count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeDef {
    extends: Vec<TypeName>,
    fields: Vec<(String, FieldDef)>,
}

impl TypeDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inherit fields from one type or an ordered list of types.
    pub fn extends(mut self, parents: impl Into<SchemaRef>) -> Self {
        self.extends = parents.into().names().to_vec();
        self
    }

    /// Declare an own field. Declaring the same name twice replaces the
    /// earlier definition in place.
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = def,
            None => self.fields.push((name, def)),
        }
        self
    }

    pub fn parents(&self) -> &[TypeName] {
        &self.extends
    }

    /// Own fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Every type this definition points at: parents first, then nested schemas.
    pub(crate) fn references(&self) -> impl Iterator<Item = &TypeName> {
        self.extends.iter().chain(
            self.fields
                .iter()
                .filter_map(|(_, def)| def.schema.as_ref())
                .flat_map(|schema| schema.names().iter()),
        )
    }
}

/// Immutable mapping from type name to type definition.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: HashMap<TypeName, TypeDef>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a type definition (builder style).
    pub fn with_type(mut self, name: impl Into<TypeName>, def: TypeDef) -> Self {
        self.register(name, def);
        self
    }

    /// Add or replace a type definition.
    pub fn register(&mut self, name: impl Into<TypeName>, def: TypeDef) {
        let name = name.into();
        if self.types.insert(name.clone(), def).is_some() {
            tracing::debug!(type_name = %name, "type definition replaced");
        }
    }

    pub fn get(&self, name: &TypeName) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names, sorted for deterministic iteration.
    pub fn names(&self) -> Vec<TypeName> {
        let mut names: Vec<TypeName> = self.types.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Build the reference graph over all registered types.
    pub fn graph(&self) -> SchemaGraph {
        SchemaGraph::from_registry(self)
    }

    /// Check the registry for dangling references and inheritance cycles.
    ///
    /// Resolution tolerates both, so this is a diagnostic for schema
    /// authors rather than a precondition.
    ///
    /// # Errors
    ///
    /// * [`SchemaError::UnknownType`] for the first reference (in sorted
    ///   type order) to an unregistered type
    /// * [`SchemaError::Cycle`] if `extends` links form a cycle
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hatchstat::schema::{SchemaRegistry, TypeDef};
    /// use hatchstat::SchemaError;
    ///
    /// let registry = SchemaRegistry::new()
    ///     .with_type("a", TypeDef::new().extends("b"))
    ///     .with_type("b", TypeDef::new().extends("a"));
    ///
    /// assert!(matches!(registry.validate(), Err(SchemaError::Cycle { .. })));
    /// ```
    pub fn validate(&self) -> Result<(), SchemaError> {
        for name in self.names() {
            if let Some(def) = self.types.get(&name) {
                if let Some(missing) = def.references().find(|r| !self.contains(r)) {
                    return Err(SchemaError::UnknownType {
                        referenced_by: name.clone(),
                        name: missing.clone(),
                    });
                }
            }
        }
        let order = self.graph().inheritance_order()?;
        tracing::debug!(types = order.len(), "schema registry validated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeclared_field_keeps_position() {
        let def = TypeDef::new()
            .field("a", FieldDef::string())
            .field("b", FieldDef::number())
            .field("a", FieldDef::boolean());

        let fields: Vec<_> = def.fields().map(|(n, d)| (n.to_string(), d.field_type)).collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "a");
        assert_eq!(fields[0].1, crate::schema::FieldType::Boolean);
    }

    #[test]
    fn test_validate_reports_unknown_parent() {
        let registry = SchemaRegistry::new().with_type("egg", TypeDef::new().extends("id"));
        let err = registry.validate().unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownType {
                referenced_by: TypeName::new("egg"),
                name: TypeName::new("id"),
            }
        );
    }

    #[test]
    fn test_validate_reports_unknown_nested_schema() {
        let registry = SchemaRegistry::new().with_type(
            "egg",
            TypeDef::new().field("pets", FieldDef::array().schema("pet")),
        );
        assert!(matches!(
            registry.validate(),
            Err(SchemaError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_diamond() {
        let registry = SchemaRegistry::new()
            .with_type("id", TypeDef::new())
            .with_type("img", TypeDef::new().extends("id"))
            .with_type("egg", TypeDef::new().extends(["id", "img"]));
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_names_sorted() {
        let registry = SchemaRegistry::new()
            .with_type("pet", TypeDef::new())
            .with_type("egg", TypeDef::new());
        let names: Vec<_> = registry.names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["egg", "pet"]);
        assert_eq!(registry.len(), 2);
    }
}
