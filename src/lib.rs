//! # hatchstat - Schema-Driven Game Data, Hatch Odds and Player Stats
//!
//! An engine for egg-hatching games that provides:
//! - **Schema-driven normalization** of untrusted JSON game data, with type
//!   inheritance, computed defaults and nested records
//! - **Deterministic** hatch probabilities with rarity-tier luck boosts and
//!   mass-conserving redistribution
//! - **Order-aware** stat composition from many modifier sources
//!
//! The engine performs no I/O. Callers fetch raw data, hand it over as
//! `serde_json::Value`, and get normalized entities and numbers back.
//!
//! ## Core Concepts
//!
//! ### Pipeline
//!
//! ```text
//! raw JSON → [Normalizer] → Dataset → [PartitionNormalizer] → pet odds
//!                                   ↘ [StatTotals]          → StatBundle
//! ```
//!
//! 1. **Schemas** describe entity types; types inherit fields with `extends`
//! 2. **Normalization** validates records, fills defaults and drops duplicates
//! 3. **Partitions** turn pet weights into chances under the player's luck
//! 4. **Modifier sources** compose into the player's final stats
//!
//! ### Key Features
//!
//! - **Cycle-Safe Inheritance**: cyclic `extends` links degrade instead of
//!   looping; `SchemaRegistry::validate` reports them
//! - **Memoized Resolution**: flattened types are cached behind a `RwLock`
//! - **Never Fails on Data**: bad records are dropped or become empty entities
//! - **Conserved Mass**: boosted epic weight is taken back from lower tiers
//!
//! ## Example
//!
//! ```rust
//! use hatchstat::probability::{LuckFactors, PartitionNormalizer, ProbabilityItem, Rarity};
//! use hatchstat::stats::{FieldBag, Stat, StatTotals};
//!
//! // compose luck from two sources
//! let mut totals = StatTotals::neutral().with_additive(Stat::Luck, 1.0);
//! totals.accumulate(&FieldBag::new().with("luck", 2.0));
//! let stats = totals.finalize();
//! assert_eq!(stats.luck, 3.0);
//!
//! // luck 3 quadruples epics; the extra weight comes out of the commons
//! let normalizer = PartitionNormalizer::new(LuckFactors::from_bundle(&stats));
//! let odds = normalizer.normalize(vec![
//!     ProbabilityItem::new("dragon", Rarity::Epic, 0.1),
//!     ProbabilityItem::new("doggy", Rarity::Common, 0.9),
//! ]);
//! assert!((odds[0].final_chance - 0.4).abs() < 1e-9);
//! assert!((odds[1].final_chance - 0.6).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`ident`] - Interned identifier types
//! - [`schema`] - Type definitions, inheritance graph and resolver
//! - [`normalize`] - Record normalization
//! - [`probability`] - Partitions, egg odds and hatch times
//! - [`stats`] - Modifier sources and stat composition
//! - [`catalog`] - Built-in game types
//! - [`dataset`] - Normalized dataset snapshots
//! - [`config`] - Engine configuration
//! - [`numeric`] - Numeric helpers
//! - [`error`] - Error types

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ident;
pub mod normalize;
pub mod numeric;
pub mod probability;
pub mod schema;
pub mod stats;

// Re-export main types for convenience
pub use config::EngineConfig;
pub use dataset::Dataset;
pub use error::{ConfigError, SchemaError};
pub use ident::{StatId, TypeName};
pub use normalize::{Entity, Normalized, Normalizer};
pub use schema::{FieldDef, SchemaRegistry, SchemaResolver, TypeDef};

// Re-export the main computations
pub use probability::{normalize_partition, pets_to_display, PartitionNormalizer, ProbabilityItem};
pub use stats::{compose_stats, ModifierSource, StatBundle, StatTotals};
