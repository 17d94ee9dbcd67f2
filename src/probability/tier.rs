//! Rarity tiers and the luck rules attached to them.

use crate::config::ProbabilityConfig;
use crate::stats::StatBundle;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Rarity class of a pet (or of a row of an infinity egg).
///
/// Unknown names are kept verbatim and rank after every known tier.
///
/// # Examples
///
/// ```rust
/// use hatchstat::probability::Rarity;
///
/// assert_eq!(Rarity::parse("legendary"), Rarity::Legendary);
/// assert!(Rarity::Epic.rank() < Rarity::Secret.rank());
/// assert_eq!(Rarity::parse("celestial").as_str(), "celestial");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    #[default]
    Common,
    Unique,
    Rare,
    Epic,
    Legendary,
    Secret,
    Infinity,
    Other(String),
}

/// How a tier reacts to luck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuckRule {
    /// Scaled by the primary multiplier composed with the secondary one.
    Compounded,
    /// Scaled by the primary multiplier alone.
    Primary,
    /// Scaled by the primary multiplier capped at a ceiling; the added mass
    /// is taken back from lower tiers.
    Capped,
    /// Not scaled.
    Unaffected,
}

impl Rarity {
    pub fn parse(name: &str) -> Self {
        match name {
            "common" => Rarity::Common,
            "unique" => Rarity::Unique,
            "rare" => Rarity::Rare,
            "epic" => Rarity::Epic,
            "legendary" => Rarity::Legendary,
            "secret" => Rarity::Secret,
            "infinity" => Rarity::Infinity,
            other => Rarity::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Rarity::Common => "common",
            Rarity::Unique => "unique",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
            Rarity::Secret => "secret",
            Rarity::Infinity => "infinity",
            Rarity::Other(name) => name,
        }
    }

    /// Display order, common first; unknown tiers sort last.
    pub fn rank(&self) -> u32 {
        match self {
            Rarity::Common => 0,
            Rarity::Unique => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
            Rarity::Secret => 5,
            Rarity::Infinity => 6,
            Rarity::Other(_) => 999,
        }
    }

    pub fn luck_rule(&self) -> LuckRule {
        match self {
            Rarity::Secret | Rarity::Infinity => LuckRule::Compounded,
            Rarity::Legendary => LuckRule::Primary,
            Rarity::Epic => LuckRule::Capped,
            _ => LuckRule::Unaffected,
        }
    }

    /// Whether items of this tier may give up weight to pay for a capped boost.
    pub fn donates_redistribution(&self) -> bool {
        self.luck_rule() == LuckRule::Unaffected
    }

    /// Whether pets of this tier can roll the mythic variant.
    pub fn is_mythic_eligible(&self) -> bool {
        matches!(self, Rarity::Legendary | Rarity::Secret | Rarity::Infinity)
    }

    pub fn cmp_rank(&self, other: &Rarity) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl From<String> for Rarity {
    fn from(name: String) -> Self {
        Rarity::parse(&name)
    }
}

impl From<&str> for Rarity {
    fn from(name: &str) -> Self {
        Rarity::parse(name)
    }
}

impl From<Rarity> for String {
    fn from(rarity: Rarity) -> Self {
        rarity.as_str().to_string()
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Luck multipliers applied during tier boosting.
///
/// # Examples
///
/// ```rust
/// use hatchstat::probability::{LuckFactors, Rarity};
///
/// // luck 5 gives a primary multiplier of 6, capped at 4 for epics
/// let luck = LuckFactors::new(5.0, 2.0);
/// assert_eq!(luck.multiplier_for(&Rarity::Epic, false), 4.0);
/// assert_eq!(luck.multiplier_for(&Rarity::Legendary, false), 6.0);
/// assert_eq!(luck.multiplier_for(&Rarity::Secret, false), 12.0);
/// assert_eq!(luck.multiplier_for(&Rarity::Secret, true), 6.0);
/// assert_eq!(luck.multiplier_for(&Rarity::Rare, false), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuckFactors {
    pub primary: f64,
    pub secondary: f64,
    pub capped_ceiling: f64,
}

impl LuckFactors {
    /// Build factors from a luck stat and a secret-luck stat.
    pub fn new(luck: f64, secret_luck: f64) -> Self {
        Self {
            primary: 1.0 + luck,
            secondary: secret_luck,
            capped_ceiling: ProbabilityConfig::default().capped_tier_ceiling,
        }
    }

    /// No boosting at all.
    pub fn neutral() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn from_bundle(bundle: &StatBundle) -> Self {
        Self::new(bundle.luck, bundle.secret_luck)
    }

    pub fn with_ceiling(mut self, ceiling: f64) -> Self {
        self.capped_ceiling = ceiling;
        self
    }

    pub fn with_config(self, config: &ProbabilityConfig) -> Self {
        self.with_ceiling(config.capped_tier_ceiling)
    }

    /// Multiplier for one item of `rarity`.
    ///
    /// `ignore_secondary` skips the secondary factor for compounded tiers.
    pub fn multiplier_for(&self, rarity: &Rarity, ignore_secondary: bool) -> f64 {
        match rarity.luck_rule() {
            LuckRule::Compounded if ignore_secondary => self.primary,
            LuckRule::Compounded => self.primary * self.secondary,
            LuckRule::Primary => self.primary,
            LuckRule::Capped => self.primary.min(self.capped_ceiling),
            LuckRule::Unaffected => 1.0,
        }
    }
}

impl Default for LuckFactors {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for name in ["common", "unique", "rare", "epic", "legendary", "secret", "infinity"] {
            assert_eq!(Rarity::parse(name).as_str(), name);
        }
    }

    #[test]
    fn test_serde_as_lowercase_string() {
        let json = serde_json::to_string(&Rarity::Secret).unwrap();
        assert_eq!(json, "\"secret\"");
        let other: Rarity = serde_json::from_str("\"shadow\"").unwrap();
        assert_eq!(other, Rarity::Other(String::from("shadow")));
    }

    #[test]
    fn test_unknown_ranks_last() {
        assert_eq!(
            Rarity::parse("shadow").cmp_rank(&Rarity::Infinity),
            Ordering::Greater
        );
    }

    #[test]
    fn test_luck_rules() {
        assert_eq!(Rarity::Infinity.luck_rule(), LuckRule::Compounded);
        assert_eq!(Rarity::Epic.luck_rule(), LuckRule::Capped);
        assert!(Rarity::Unique.donates_redistribution());
        assert!(!Rarity::Legendary.donates_redistribution());
        assert!(Rarity::parse("shadow").donates_redistribution());
    }

    #[test]
    fn test_low_luck_is_below_ceiling() {
        let luck = LuckFactors::new(1.0, 1.0);
        assert_eq!(luck.multiplier_for(&Rarity::Epic, false), 2.0);
    }

    #[test]
    fn test_mythic_eligibility() {
        assert!(Rarity::Legendary.is_mythic_eligible());
        assert!(!Rarity::Epic.is_mythic_eligible());
    }
}
