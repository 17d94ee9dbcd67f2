//! Finalized stats.

use crate::probability::{LuckFactors, VariantRates};
use serde::{Deserialize, Serialize};

/// Player stats after every modifier source was applied.
///
/// `luck` feeds the primary luck multiplier (`1 + luck`), `secret_luck` the
/// secondary one; `shiny_chance` and `mythic_chance` are per-hatch rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatBundle {
    pub luck: f64,
    pub secret_luck: f64,
    pub shiny_chance: f64,
    pub mythic_chance: f64,
    pub hatch_speed: f64,
    pub eggs_per_hatch: f64,
}

impl StatBundle {
    pub fn luck_factors(&self) -> LuckFactors {
        LuckFactors::from_bundle(self)
    }

    pub fn variant_rates(&self) -> VariantRates {
        VariantRates::from_bundle(self)
    }
}

/// No luck, no variants, one egg at base speed.
impl Default for StatBundle {
    fn default() -> Self {
        Self {
            luck: 0.0,
            secret_luck: 1.0,
            shiny_chance: 0.0,
            mythic_chance: 0.0,
            hatch_speed: 1.0,
            eggs_per_hatch: 1.0,
        }
    }
}
