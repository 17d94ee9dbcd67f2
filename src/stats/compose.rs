//! Full stat composition.
//!
//! Sources are applied in a fixed order: caller modifiers, bubble blessing,
//! dreamer blessing, season perks, world index bonuses, mastery bonuses and
//! finally the daily perk. Anything time-dependent (which daily perk is
//! active) is selected by the caller.

use crate::config::StatConfig;
use crate::normalize::Entity;
use crate::stats::blessing::{bubble_blessing, dreamer_blessing, season_perks};
use crate::stats::bundle::StatBundle;
use crate::stats::source::Repeated;
use crate::stats::totals::StatTotals;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// On/off switches chosen by the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatToggles {
    /// Normal world index completed.
    pub world_normal: bool,
    /// Shiny world index completed.
    pub world_shiny: bool,
    pub faster_hatch_mastery: bool,
    /// Premium daily perks instead of the normal ones.
    pub daily_perks: bool,
}

/// Numeric inputs chosen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatKnobs {
    pub shrine_blessing: f64,
    pub dreamer_blessing: f64,
    pub season_stars: f64,
    /// Number of friends hatching together.
    pub luckier_together: f64,
    pub eggs_per_hatch: f64,
}

impl Default for StatKnobs {
    fn default() -> Self {
        Self {
            shrine_blessing: 0.0,
            dreamer_blessing: 0.0,
            season_stars: 0.0,
            luckier_together: 0.0,
            eggs_per_hatch: 1.0,
        }
    }
}

/// Everything [`compose_stats`] reads.
///
/// `index` and `mastery` are normalized `indexData` and `masteryData`
/// entities; `daily_perk` is today's `dailyPerk` entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatInputs<'a> {
    pub modifiers: &'a [Entity],
    pub toggles: StatToggles,
    pub knobs: StatKnobs,
    pub index: Option<&'a Entity>,
    pub mastery: Option<&'a Entity>,
    pub daily_perk: Option<&'a Entity>,
}

impl<'a> StatInputs<'a> {
    pub fn new(modifiers: &'a [Entity]) -> Self {
        Self {
            modifiers,
            ..Self::default()
        }
    }
}

/// Compose the player's final stats.
///
/// # Examples
///
/// ```rust
/// use hatchstat::config::StatConfig;
/// use hatchstat::stats::{compose_stats, StatInputs};
/// use serde_json::{json, Value};
///
/// let Value::Object(potion) = json!({"luck": 1.0}) else { unreachable!() };
/// let modifiers = [potion];
/// let mut inputs = StatInputs::new(&modifiers);
/// inputs.knobs.eggs_per_hatch = 3.0;
///
/// let stats = compose_stats(&inputs, &StatConfig::default());
/// // 0 + (2 + 1) × 1 - 1
/// assert_eq!(stats.luck, 2.0);
/// assert_eq!(stats.eggs_per_hatch, 3.0);
/// ```
pub fn compose_stats(inputs: &StatInputs<'_>, config: &StatConfig) -> StatBundle {
    let StatInputs {
        modifiers,
        toggles,
        knobs,
        index,
        mastery,
        daily_perk,
    } = *inputs;

    let mut totals = StatTotals::from_config(config);
    totals.accumulate_all(modifiers);

    totals.accumulate(&bubble_blessing(knobs.shrine_blessing));
    totals.accumulate(&dreamer_blessing(knobs.dreamer_blessing));
    totals.accumulate(&season_perks(knobs.season_stars));

    if toggles.world_normal {
        if let Some(bonus) = child(index, "normal") {
            totals.accumulate(bonus);
        }
    }
    if toggles.world_shiny {
        if let Some(bonus) = child(index, "shiny") {
            totals.accumulate(bonus);
        }
    }

    if toggles.faster_hatch_mastery {
        if let Some(bonus) = child(mastery, "fasterHatch") {
            totals.accumulate(bonus);
        }
    }
    if knobs.luckier_together > 0.0 {
        if let Some(bonus) = child(mastery, "luckierTogether") {
            totals.accumulate(&Repeated::new(bonus, knobs.luckier_together));
        }
    }

    let perk_tier = if toggles.daily_perks { "premium" } else { "normal" };
    if let Some(perk) = child(daily_perk, perk_tier) {
        totals.accumulate(perk);
    }

    tracing::debug!(sources = totals.applied(), "stats composed");

    let mut bundle = totals.finalize();
    bundle.eggs_per_hatch = knobs.eggs_per_hatch;
    bundle
}

/// Select the daily perk for `weekday` (0 is Sunday) from normalized
/// `dailyPerksData`.
pub fn daily_perk_for(perks: &Entity, weekday: u32) -> Option<&Entity> {
    perks.get(&(weekday % 7).to_string()).and_then(Value::as_object)
}

fn child<'a>(entity: Option<&'a Entity>, field: &str) -> Option<&'a Entity> {
    entity?.get(field).and_then(Value::as_object)
}
