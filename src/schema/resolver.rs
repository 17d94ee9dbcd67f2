//! Schema resolver module.
//!
//! Provides the `SchemaResolver` type, which flattens a type's inheritance
//! chain into one ordered field map and memoizes the result. The registry
//! is immutable, so a resolved schema never goes stale.

use crate::ident::TypeName;
use crate::schema::field::FieldDef;
use crate::schema::registry::{SchemaRef, SchemaRegistry};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// The merged field map of one type (or an ordered list of types).
///
/// Fields keep the position at which their name was first merged; a later
/// definition of the same name replaces the definition but not the
/// position. Normalization visits fields in this order, so computed
/// defaults can read siblings that appear earlier.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSchema {
    fields: Vec<(String, FieldDef)>,
    positions: HashMap<String, usize>,
}

impl ResolvedSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one field, overriding any earlier definition of the same name.
    pub fn merge_field(&mut self, name: &str, def: FieldDef) {
        match self.positions.get(name) {
            Some(&pos) => self.fields[pos].1 = def,
            None => {
                self.positions.insert(name.to_string(), self.fields.len());
                self.fields.push((name.to_string(), def));
            }
        }
    }

    /// Merge every field of `other`, in its order.
    pub fn merge(&mut self, other: &ResolvedSchema) {
        for (name, def) in &other.fields {
            self.merge_field(name, def.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.positions.get(name).map(|&pos| &self.fields[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Resolves type names against a shared registry.
///
/// Resolution is depth-first over `extends`, left to right, merging each
/// ancestor before the type's own fields. Re-entering a type that is still
/// being visited is a no-op, so cyclic `extends` links terminate instead of
/// recursing forever; an ancestor reached twice (a diamond) merges once.
/// Unknown type names contribute no fields.
///
/// # Examples
///
/// ```rust
/// use hatchstat::schema::{FieldDef, SchemaRegistry, SchemaResolver, TypeDef};
/// use hatchstat::TypeName;
/// use std::sync::Arc;
///
/// let registry = SchemaRegistry::new()
///     .with_type("id", TypeDef::new()
///         .field("id", FieldDef::string().required())
///         .field("name", FieldDef::string()))
///     .with_type("world", TypeDef::new()
///         .extends("id")
///         .field("imageDir", FieldDef::string().default("worlds")));
///
/// let resolver = SchemaResolver::new(Arc::new(registry));
/// let world = resolver.resolve(&TypeName::new("world"));
/// assert_eq!(world.field_names(), vec!["id", "name", "imageDir"]);
/// ```
pub struct SchemaResolver {
    registry: Arc<SchemaRegistry>,
    cache: RwLock<HashMap<TypeName, Arc<ResolvedSchema>>>,
}

impl SchemaResolver {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Resolve a single type name.
    pub fn resolve(&self, name: &TypeName) -> Arc<ResolvedSchema> {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(cached);
        }

        let mut merged = ResolvedSchema::new();
        let mut visiting = HashSet::new();
        let mut visited = HashSet::new();
        self.visit(name, &mut merged, &mut visiting, &mut visited);

        let resolved = Arc::new(merged);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), Arc::clone(&resolved));
        resolved
    }

    /// Resolve a single name or merge an ordered list of names.
    ///
    /// For a list, each name is resolved independently and later names
    /// override earlier ones.
    pub fn resolve_like(&self, schema: &SchemaRef) -> Arc<ResolvedSchema> {
        match schema {
            SchemaRef::One(name) => self.resolve(name),
            SchemaRef::Many(names) => {
                let mut merged = ResolvedSchema::new();
                for name in names {
                    merged.merge(&self.resolve(name));
                }
                Arc::new(merged)
            }
        }
    }

    /// Number of memoized type names.
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn visit(
        &self,
        name: &TypeName,
        merged: &mut ResolvedSchema,
        visiting: &mut HashSet<TypeName>,
        visited: &mut HashSet<TypeName>,
    ) {
        let Some(def) = self.registry.get(name) else {
            tracing::debug!(type_name = %name, "unknown type contributes no fields");
            return;
        };
        if visiting.contains(name) {
            tracing::trace!(type_name = %name, "inheritance cycle edge ignored");
            return;
        }
        if visited.contains(name) {
            return;
        }

        visiting.insert(name.clone());
        for parent in def.parents() {
            self.visit(parent, merged, visiting, visited);
        }
        for (field, field_def) in def.fields() {
            merged.merge_field(field, field_def.clone());
        }
        visiting.remove(name);
        visited.insert(name.clone());
    }
}

impl std::fmt::Debug for SchemaResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaResolver")
            .field("types", &self.registry.len())
            .field("cached", &self.cached_len())
            .finish()
    }
}
