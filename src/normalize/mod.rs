//! Schema-driven normalization of raw records.

pub mod builder;
pub mod context;
pub mod normalizer;

pub use builder::{Entity, EntityBuilder};
pub use context::FieldContext;
pub use normalizer::{Normalized, Normalizer};
