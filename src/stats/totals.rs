//! Running stat totals.
//!
//! Each [`Stat`] keeps three running values fed by modifier sources: an
//! additive total (`luck`), a base total (`baseLuck`) and a multiplier
//! (`luckMultiplier`). `finalize` folds them into one number per stat.

use crate::config::StatConfig;
use crate::numeric::neutral_if_zero;
use crate::stats::bundle::StatBundle;
use crate::stats::source::ModifierSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A composed player stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Luck,
    SecretLuck,
    ShinyChance,
    MythicChance,
    HatchSpeed,
}

/// How multiplier contributions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplierMode {
    /// Starts at 0 and adds; a total still at 0 when finalized counts as 1.
    Summed,
    /// Starts at 1 and multiplies.
    Compounded,
}

impl MultiplierMode {
    pub fn initial(self) -> f64 {
        match self {
            MultiplierMode::Summed => 0.0,
            MultiplierMode::Compounded => 1.0,
        }
    }

    pub fn compose(self, total: f64, contribution: f64) -> f64 {
        match self {
            MultiplierMode::Summed => total + contribution,
            MultiplierMode::Compounded => total * contribution,
        }
    }
}

/// Formula used to turn running totals into the final stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalShape {
    /// `base + additive × multiplier`
    OffsetPlusScale,
    /// `base × (1 + additive) × multiplier`, where `base` is a reciprocal
    /// rate such as 1/40.
    ScaledReciprocalBase,
}

impl Stat {
    pub const ALL: [Stat; 5] = [
        Stat::Luck,
        Stat::SecretLuck,
        Stat::ShinyChance,
        Stat::MythicChance,
        Stat::HatchSpeed,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn additive_field(self) -> &'static str {
        match self {
            Stat::Luck => "luck",
            Stat::SecretLuck => "secretLuck",
            Stat::ShinyChance => "shinyChance",
            Stat::MythicChance => "mythicChance",
            Stat::HatchSpeed => "hatchSpeed",
        }
    }

    pub fn base_field(self) -> &'static str {
        match self {
            Stat::Luck => "baseLuck",
            Stat::SecretLuck => "baseSecretLuck",
            Stat::ShinyChance => "baseShinyChance",
            Stat::MythicChance => "baseMythicChance",
            Stat::HatchSpeed => "baseHatchSpeed",
        }
    }

    pub fn multiplier_field(self) -> &'static str {
        match self {
            Stat::Luck => "luckMultiplier",
            Stat::SecretLuck => "secretLuckMultiplier",
            Stat::ShinyChance => "shinyChanceMultiplier",
            Stat::MythicChance => "mythicChanceMultiplier",
            Stat::HatchSpeed => "hatchSpeedMultiplier",
        }
    }

    /// Flag that makes a source replace this stat's multiplier.
    pub fn overwrite_field(self) -> Option<&'static str> {
        match self {
            Stat::MythicChance => Some("overwriteMythicChanceMultiplier"),
            _ => None,
        }
    }

    pub fn multiplier_mode(self) -> MultiplierMode {
        match self {
            Stat::Luck | Stat::HatchSpeed => MultiplierMode::Summed,
            Stat::SecretLuck | Stat::ShinyChance | Stat::MythicChance => {
                MultiplierMode::Compounded
            }
        }
    }

    pub fn shape(self) -> FinalShape {
        match self {
            Stat::ShinyChance | Stat::MythicChance => FinalShape::ScaledReciprocalBase,
            Stat::Luck | Stat::SecretLuck | Stat::HatchSpeed => FinalShape::OffsetPlusScale,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.additive_field())
    }
}

/// Running values of one stat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTotal {
    pub additive: f64,
    pub base: f64,
    pub multiplier: f64,
    /// Set once a source replaced the multiplier; later contributions to
    /// the multiplier are ignored.
    pub overwritten: bool,
}

impl StatTotal {
    fn new(additive: f64, base: f64, mode: MultiplierMode) -> Self {
        Self {
            additive,
            base,
            multiplier: mode.initial(),
            overwritten: false,
        }
    }

    /// The multiplier used at finalize; zero counts as neutral.
    pub fn effective_multiplier(&self) -> f64 {
        neutral_if_zero(self.multiplier)
    }

    pub fn value(&self, shape: FinalShape) -> f64 {
        let multiplier = self.effective_multiplier();
        match shape {
            FinalShape::OffsetPlusScale => self.base + self.additive * multiplier,
            FinalShape::ScaledReciprocalBase => self.base * (1.0 + self.additive) * multiplier,
        }
    }
}

/// Running totals for every stat.
///
/// # Examples
///
/// ```rust
/// use hatchstat::stats::{FieldBag, Stat, StatTotals};
///
/// let mut totals = StatTotals::neutral().with_additive(Stat::Luck, 1.0);
/// totals.accumulate(&FieldBag::new().with("luck", 0.5).with("luckMultiplier", 2.0));
///
/// assert_eq!(totals.finalize().luck, 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StatTotals {
    totals: [StatTotal; 5],
    luck_correction: f64,
    applied: usize,
}

impl StatTotals {
    /// All additive and base totals at zero, multipliers at their neutral
    /// start and no luck correction.
    pub fn neutral() -> Self {
        Self {
            totals: Stat::ALL.map(|stat| StatTotal::new(0.0, 0.0, stat.multiplier_mode())),
            luck_correction: 0.0,
            applied: 0,
        }
    }

    /// Totals seeded from a configured baseline.
    pub fn from_config(config: &StatConfig) -> Self {
        let b = &config.baseline;
        let mut totals = Self::neutral()
            .with_additive(Stat::Luck, b.luck)
            .with_additive(Stat::SecretLuck, b.secret_luck)
            .with_additive(Stat::ShinyChance, b.shiny_chance)
            .with_additive(Stat::MythicChance, b.mythic_chance)
            .with_additive(Stat::HatchSpeed, b.hatch_speed)
            .with_base(Stat::Luck, b.base_luck)
            .with_base(Stat::SecretLuck, b.base_secret_luck)
            .with_base(Stat::ShinyChance, b.base_shiny_chance)
            .with_base(Stat::MythicChance, b.base_mythic_chance)
            .with_base(Stat::HatchSpeed, b.base_hatch_speed);
        totals.luck_correction = config.luck_correction;
        totals
    }

    pub fn with_additive(mut self, stat: Stat, value: f64) -> Self {
        self.totals[stat.index()].additive = value;
        self
    }

    pub fn with_base(mut self, stat: Stat, value: f64) -> Self {
        self.totals[stat.index()].base = value;
        self
    }

    pub fn get(&self, stat: Stat) -> &StatTotal {
        &self.totals[stat.index()]
    }

    /// Number of sources that were not skipped.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Fold one source into the totals.
    ///
    /// A source whose repeat count is zero or not a number is skipped. The
    /// repeat count scales additive and base fields but not multipliers.
    /// Fields that are absent or not numbers contribute nothing.
    pub fn accumulate<S: ModifierSource + ?Sized>(&mut self, source: &S) {
        let Some(times) = source.repeat_count() else {
            tracing::trace!("source skipped by its repeat count");
            return;
        };

        for stat in Stat::ALL {
            let total = &mut self.totals[stat.index()];

            if let Some(value) = source.number(stat.additive_field()) {
                total.additive += value * times;
            }
            if let Some(value) = source.number(stat.base_field()) {
                total.base += value * times;
            }
            if let Some(value) = source.number(stat.multiplier_field()) {
                if total.overwritten {
                    tracing::trace!(%stat, value, "multiplier already overwritten, contribution ignored");
                } else if stat.overwrite_field().is_some_and(|flag| source.flag(flag)) {
                    tracing::debug!(%stat, value, "multiplier overwritten");
                    total.multiplier = value;
                    total.overwritten = true;
                } else {
                    total.multiplier = stat.multiplier_mode().compose(total.multiplier, value);
                }
            }
        }
        self.applied += 1;
    }

    /// Fold every source in order.
    pub fn accumulate_all<I>(&mut self, sources: I)
    where
        I: IntoIterator,
        I::Item: ModifierSource,
    {
        for source in sources {
            self.accumulate(&source);
        }
    }

    /// Derive the final stats.
    ///
    /// `eggs_per_hatch` is left at 1; the caller sets it when known.
    pub fn finalize(&self) -> StatBundle {
        let value = |stat: Stat| self.get(stat).value(stat.shape());
        StatBundle {
            luck: value(Stat::Luck) - self.luck_correction,
            secret_luck: value(Stat::SecretLuck),
            shiny_chance: value(Stat::ShinyChance),
            mythic_chance: value(Stat::MythicChance),
            hatch_speed: value(Stat::HatchSpeed),
            eggs_per_hatch: 1.0,
        }
    }
}

impl Default for StatTotals {
    fn default() -> Self {
        Self::from_config(&StatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::source::FieldBag;
    use serde_json::{json, Map, Value};

    fn source(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_summed_multiplier_starts_at_zero() {
        let mut totals = StatTotals::neutral().with_additive(Stat::Luck, 1.0);
        assert_eq!(totals.get(Stat::Luck).multiplier, 0.0);
        totals.accumulate(&source(json!({"luck": 0.5, "luckMultiplier": 2})));
        assert_eq!(totals.get(Stat::Luck).multiplier, 2.0);
        assert_eq!(totals.finalize().luck, 3.0);
    }

    #[test]
    fn test_first_overwrite_wins() {
        let mut totals = StatTotals::neutral();
        totals.accumulate_all([
            source(json!({"mythicChanceMultiplier": 2})),
            source(json!({"mythicChanceMultiplier": 5, "overwriteMythicChanceMultiplier": true})),
            source(json!({"mythicChanceMultiplier": 3})),
            source(json!({"mythicChanceMultiplier": 7, "overwriteMythicChanceMultiplier": true})),
        ]);
        let mythic = totals.get(Stat::MythicChance);
        assert_eq!(mythic.multiplier, 5.0);
        assert!(mythic.overwritten);
    }

    #[test]
    fn test_overwrite_flag_only_applies_to_mythic() {
        let mut totals = StatTotals::neutral();
        totals.accumulate(&source(json!({
            "shinyChanceMultiplier": 2,
            "overwriteMythicChanceMultiplier": true
        })));
        totals.accumulate(&source(json!({"shinyChanceMultiplier": 3})));
        assert_eq!(totals.get(Stat::ShinyChance).multiplier, 6.0);
        assert!(!totals.get(Stat::ShinyChance).overwritten);
    }

    #[test]
    fn test_repeat_count_scales_additive_and_base_only() {
        let mut totals = StatTotals::neutral();
        totals.accumulate(&source(json!({
            "_value": 3,
            "hatchSpeed": 0.1,
            "baseHatchSpeed": 1,
            "hatchSpeedMultiplier": 2
        })));
        let hatch = totals.get(Stat::HatchSpeed);
        assert!((hatch.additive - 0.3).abs() < 1e-12);
        assert_eq!(hatch.base, 3.0);
        assert_eq!(hatch.multiplier, 2.0);
    }

    #[test]
    fn test_zero_repeat_skips_source() {
        let mut totals = StatTotals::neutral();
        totals.accumulate(&source(json!({"_value": 0, "luck": 100})));
        assert_eq!(totals.get(Stat::Luck).additive, 0.0);
        assert_eq!(totals.applied(), 0);
    }

    #[test]
    fn test_malformed_fields_are_ignored() {
        let mut totals = StatTotals::neutral();
        totals.accumulate(&source(json!({"luck": "lots", "secretLuck": 2, "shinyChance": null})));
        assert_eq!(totals.get(Stat::Luck).additive, 0.0);
        assert_eq!(totals.get(Stat::SecretLuck).additive, 2.0);
        assert_eq!(totals.applied(), 1);
    }

    #[test]
    fn test_default_baseline_finalize() {
        let bundle = StatTotals::default().finalize();
        // 0 + 2 × 1 - 1
        assert_eq!(bundle.luck, 1.0);
        assert_eq!(bundle.secret_luck, 1.0);
        assert_eq!(bundle.shiny_chance, 1.0 / 40.0);
        assert_eq!(bundle.mythic_chance, 1.0 / 100.0);
        assert_eq!(bundle.hatch_speed, 1.0);
    }

    #[test]
    fn test_chance_shape() {
        let mut totals = StatTotals::neutral().with_base(Stat::ShinyChance, 0.025);
        totals.accumulate(&FieldBag::new().with("shinyChance", 1.0).with("shinyChanceMultiplier", 2.0));
        assert!((totals.finalize().shiny_chance - 0.1).abs() < 1e-12);
    }
}
