//! Type reference graph.
//!
//! Provides the `SchemaGraph` type, which records which types a type
//! inherits from (`extends`) and which types its fields nest
//! (`schema`). Inheritance must be acyclic for a registry to validate;
//! nesting may legitimately recurse and is not checked for cycles.

use crate::error::SchemaError;
use crate::ident::TypeName;
use crate::schema::registry::SchemaRegistry;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Kind of reference from one type to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// The source type inherits the target's fields.
    Extends,
    /// A field of the source type normalizes nested records against the target.
    Nested,
}

/// A directed graph of type references.
///
/// Edges point from the referencing type to the referenced type, so a
/// path `egg -> img -> id` reads "egg extends img, which extends id".
///
/// # Examples
///
/// ```rust
/// use hatchstat::schema::{EdgeKind, SchemaGraph};
/// use hatchstat::TypeName;
///
/// let mut graph = SchemaGraph::new();
/// let egg = TypeName::new("egg");
/// let id = TypeName::new("id");
///
/// graph.add_edge(egg.clone(), id.clone(), EdgeKind::Extends);
///
/// // Parents come before children
/// let order = graph.inheritance_order().unwrap();
/// assert_eq!(order, vec![id, egg]);
/// ```
pub struct SchemaGraph {
    graph: DiGraph<TypeName, EdgeKind>,
    node_map: HashMap<TypeName, NodeIndex>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build the graph for every type in `registry`, in sorted name order.
    pub fn from_registry(registry: &SchemaRegistry) -> Self {
        let mut graph = Self::new();
        for name in registry.names() {
            graph.add_node(name.clone());
            let Some(def) = registry.get(&name) else {
                continue;
            };
            for parent in def.parents() {
                graph.add_edge(name.clone(), parent.clone(), EdgeKind::Extends);
            }
            for (_, field) in def.fields() {
                if let Some(schema) = &field.schema {
                    for nested in schema.names() {
                        graph.add_edge(name.clone(), nested.clone(), EdgeKind::Nested);
                    }
                }
            }
        }
        graph
    }

    /// Add a node to the graph if it doesn't exist.
    ///
    /// Returns the existing index when the type is already present.
    pub fn add_node(&mut self, name: TypeName) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&name) {
            idx
        } else {
            let idx = self.graph.add_node(name.clone());
            self.node_map.insert(name, idx);
            idx
        }
    }

    /// Add an edge `from -> to` of the given kind.
    ///
    /// Both nodes are added if they don't exist yet.
    pub fn add_edge(&mut self, from: TypeName, to: TypeName, kind: EdgeKind) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        self.graph.add_edge(from_idx, to_idx, kind);
    }

    pub fn contains_node(&self, name: &TypeName) -> bool {
        self.node_map.contains_key(name)
    }

    /// Detect cycles among `extends` edges.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if inheritance is acyclic
    /// * `Err(SchemaError::Cycle)` with the closed cycle path otherwise
    pub fn detect_cycles(&self) -> Result<(), SchemaError> {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();

        for node_idx in self.graph.node_indices() {
            if !visited.contains(&node_idx) {
                let mut path = Vec::new();
                if let Some(cycle) =
                    self.dfs_cycle_detect(node_idx, &mut visited, &mut on_stack, &mut path)
                {
                    return Err(cycle);
                }
            }
        }

        Ok(())
    }

    fn dfs_cycle_detect(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        on_stack: &mut HashSet<NodeIndex>,
        path: &mut Vec<TypeName>,
    ) -> Option<SchemaError> {
        visited.insert(node);
        on_stack.insert(node);
        path.push(self.graph[node].clone());

        let parents = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|edge| *edge.weight() == EdgeKind::Extends)
            .map(|edge| edge.target());

        for parent in parents {
            if !visited.contains(&parent) {
                if let Some(cycle) = self.dfs_cycle_detect(parent, visited, on_stack, path) {
                    return Some(cycle);
                }
            } else if on_stack.contains(&parent) {
                let parent_name = self.graph[parent].clone();
                let start = path
                    .iter()
                    .position(|name| *name == parent_name)
                    .unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(parent_name);
                return Some(SchemaError::Cycle { path: cycle });
            }
        }

        on_stack.remove(&node);
        path.pop();
        None
    }

    /// All types ordered so that every parent precedes the types extending it.
    ///
    /// Nested-schema edges do not constrain the order.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Cycle` if inheritance is cyclic.
    pub fn inheritance_order(&self) -> Result<Vec<TypeName>, SchemaError> {
        self.detect_cycles()?;

        let inheritance = self.graph.filter_map(
            |_, name| Some(name.clone()),
            |_, kind| (*kind == EdgeKind::Extends).then_some(*kind),
        );

        match toposort(&inheritance, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .rev()
                .map(|idx| inheritance[idx].clone())
                .collect()),
            Err(cycle) => Err(SchemaError::Cycle {
                path: vec![inheritance[cycle.node_id()].clone()],
            }),
        }
    }
}

impl Default for SchemaGraph {
    fn default() -> Self {
        Self::new()
    }
}
