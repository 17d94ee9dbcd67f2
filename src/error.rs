//! Error types.
//!
//! Normalization, probability and stat composition never fail: bad input
//! degrades into smaller or empty results. Errors only exist at the edges
//! that can genuinely fail: registry diagnostics and configuration parsing.

use crate::ident::TypeName;
use thiserror::Error;

/// Format a cycle path as a readable string.
fn format_cycle_path(path: &[TypeName]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.iter()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Problems found when checking a schema registry.
///
/// Resolution itself tolerates both problems (cycle edges are ignored and
/// unknown names contribute no fields); these errors are reported only by
/// [`SchemaRegistry::validate`](crate::schema::SchemaRegistry::validate).
///
/// # Examples
///
/// ```rust
/// use hatchstat::{SchemaError, TypeName};
///
/// let err = SchemaError::UnknownType {
///     referenced_by: TypeName::new("egg"),
///     name: TypeName::new("critter"),
/// };
/// assert_eq!(err.to_string(), "Type egg references unknown type: critter");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    /// The `extends` links form a cycle.
    ///
    /// The path closes the loop, e.g. `[a, b, a]`.
    #[error("Inheritance cycle detected: {}", format_cycle_path(.path))]
    Cycle { path: Vec<TypeName> },

    /// An `extends` entry or nested `schema` names a type that is not registered.
    #[error("Type {referenced_by} references unknown type: {name}")]
    UnknownType {
        referenced_by: TypeName,
        name: TypeName,
    },
}

/// Errors raised while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text was not valid JSON for the expected shape.
    #[error("Invalid engine configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is outside its meaningful range.
    #[error("Invalid value for {field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}
