//! Probability engine.
//!
//! - [`tier`] - rarity tiers and luck rules
//! - [`item`] - items competing in a partition
//! - [`partition`] - normalization, tier boosts and redistribution
//! - [`hierarchy`] - two-level partitions
//! - [`variant`] - shiny and mythic splits
//! - [`egg`] - egg odds, rarity ordering and pet injection
//! - [`hatch`] - expected hatch times

pub mod egg;
pub mod hatch;
pub mod hierarchy;
pub mod item;
pub mod partition;
pub mod tier;
pub mod variant;

pub use egg::{bounty_for_date, inject_pets, pets_to_display, sort_by_rarity, BountyPlacement};
pub use hatch::{eggs_per_second, hatch_time};
pub use hierarchy::normalize_hierarchical;
pub use item::ProbabilityItem;
pub use partition::{
    apply_tier_boosts, finalize_chances, normalize_partition, normalize_weights,
    redistribute_decrease, PartitionNormalizer,
};
pub use tier::{LuckFactors, LuckRule, Rarity};
pub use variant::{variant_chances, VariantChances, VariantRates};
