//! Variant chances.
//!
//! Shiny and mythic rolls are treated as independent of each other and of
//! which pet hatched, so every combination is a plain product.

use crate::numeric::clamp_or_min;
use crate::probability::item::ProbabilityItem;
use crate::stats::StatBundle;
use serde::{Deserialize, Serialize};

/// Per-hatch rates of the secondary variant rolls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRates {
    pub shiny: f64,
    pub mythic: f64,
}

impl VariantRates {
    /// Rates are clamped to `[0, 1]`.
    pub fn new(shiny: f64, mythic: f64) -> Self {
        Self {
            shiny: clamp_or_min(shiny, 0.0, 1.0),
            mythic: clamp_or_min(mythic, 0.0, 1.0),
        }
    }

    pub fn from_bundle(bundle: &StatBundle) -> Self {
        Self::new(bundle.shiny_chance, bundle.mythic_chance)
    }
}

/// Chance of hatching one pet with each variant trait.
///
/// `shiny` and `mythic` count every hatch carrying that trait, so both
/// include `shiny_mythic`. `normal` is the chance of neither trait.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantChances {
    pub normal: f64,
    pub shiny: f64,
    pub mythic: f64,
    pub shiny_mythic: f64,
}

impl VariantChances {
    /// Sum of the disjoint outcomes; equals the item's `final_chance`.
    pub fn total(&self) -> f64 {
        self.normal + self.shiny + self.mythic - self.shiny_mythic
    }
}

/// Split an item's final chance into its variants.
///
/// `mythic` and `shiny_mythic` are zero unless the item keeps `has_mythic`
/// and its tier can roll mythic.
///
/// # Examples
///
/// ```rust
/// use hatchstat::probability::{variant_chances, ProbabilityItem, Rarity, VariantRates};
///
/// let mut pet = ProbabilityItem::new("king", Rarity::Secret, 1.0);
/// pet.final_chance = 0.5;
///
/// let chances = variant_chances(&pet, VariantRates::new(0.1, 0.2));
/// assert!((chances.shiny - 0.5 * 0.1).abs() < 1e-12);
/// assert!((chances.shiny_mythic - 0.5 * 0.1 * 0.2).abs() < 1e-12);
/// assert!((chances.total() - 0.5).abs() < 1e-12);
/// ```
pub fn variant_chances(item: &ProbabilityItem, rates: VariantRates) -> VariantChances {
    let chance = item.final_chance;
    let shiny = rates.shiny;
    let mythic = if item.has_mythic && item.rarity.is_mythic_eligible() {
        rates.mythic
    } else {
        0.0
    };

    VariantChances {
        normal: chance * (1.0 - shiny) * (1.0 - mythic),
        shiny: chance * shiny,
        mythic: chance * mythic,
        shiny_mythic: chance * shiny * mythic,
    }
}
