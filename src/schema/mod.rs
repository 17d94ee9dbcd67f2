//! Type definitions with inheritance.
//!
//! - [`field`] - field definitions, defaults and conditions
//! - [`registry`] - the immutable type registry
//! - [`graph`] - reference graph and inheritance diagnostics
//! - [`resolver`] - inheritance flattening with memoization

pub mod field;
pub mod graph;
pub mod registry;
pub mod resolver;

pub use field::{Condition, FieldDef, FieldDefault, FieldType};
pub use graph::{EdgeKind, SchemaGraph};
pub use registry::{SchemaRef, SchemaRegistry, TypeDef};
pub use resolver::{ResolvedSchema, SchemaResolver};
