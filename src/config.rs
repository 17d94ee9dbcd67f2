//! Engine configuration.
//!
//! Every knob has a default matching the live game balance, so
//! `EngineConfig::default()` is a complete configuration. Callers that need
//! different balance numbers load a partial JSON document; missing fields
//! fall back to their defaults.

use crate::error::ConfigError;
use crate::numeric::REDISTRIBUTION_EPSILON;
use serde::{Deserialize, Serialize};

/// Top-level configuration for normalization, probability and stat composition.
///
/// # Examples
///
/// ```rust
/// use hatchstat::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{ "probability": { "cappedTierCeiling": 3.0 } }"#).unwrap();
/// assert_eq!(config.probability.capped_tier_ceiling, 3.0);
/// assert_eq!(config.identity_field, "id");
/// assert_eq!(config.hatch.base_hatch_seconds, 4.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Field used to deduplicate records inside one normalized array.
    pub identity_field: String,
    pub probability: ProbabilityConfig,
    pub stats: StatConfig,
    pub hatch: HatchConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            identity_field: String::from("id"),
            probability: ProbabilityConfig::default(),
            stats: StatConfig::default(),
            hatch: HatchConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON text and check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::OutOfRange`] for values that would break the engines
    /// (non-positive hatch time, a tier ceiling below 1, a non-positive epsilon).
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.probability.capped_tier_ceiling >= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "probability.cappedTierCeiling",
                reason: format!("{} is below 1", self.probability.capped_tier_ceiling),
            });
        }
        if !(self.probability.redistribution_epsilon > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "probability.redistributionEpsilon",
                reason: format!("{} is not positive", self.probability.redistribution_epsilon),
            });
        }
        if !(self.hatch.base_hatch_seconds > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "hatch.baseHatchSeconds",
                reason: format!("{} is not positive", self.hatch.base_hatch_seconds),
            });
        }
        if self.identity_field.is_empty() {
            return Err(ConfigError::OutOfRange {
                field: "identityField",
                reason: String::from("must not be empty"),
            });
        }
        Ok(())
    }
}

/// Knobs for partition normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbabilityConfig {
    /// Ceiling applied to the luck multiplier of the capped (epic) tier.
    pub capped_tier_ceiling: f64,
    /// Remaining deficits and weights at or below this value count as zero
    /// during redistribution.
    pub redistribution_epsilon: f64,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            capped_tier_ceiling: 4.0,
            redistribution_epsilon: REDISTRIBUTION_EPSILON,
        }
    }
}

/// Starting totals and finalize adjustments for the stat composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatConfig {
    pub baseline: StatBaseline,
    /// Subtracted from the finalized luck value.
    ///
    /// Defaults to 1, so a player with no bonuses ends at luck 1.
    pub luck_correction: f64,
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            baseline: StatBaseline::default(),
            luck_correction: 1.0,
        }
    }
}

/// Initial running totals before any modifier source is applied.
///
/// Multiplier totals are not listed: they always start at their neutral
/// value for their composition mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatBaseline {
    pub luck: f64,
    pub secret_luck: f64,
    pub shiny_chance: f64,
    pub mythic_chance: f64,
    pub hatch_speed: f64,
    pub base_luck: f64,
    pub base_secret_luck: f64,
    pub base_shiny_chance: f64,
    pub base_mythic_chance: f64,
    pub base_hatch_speed: f64,
}

impl Default for StatBaseline {
    fn default() -> Self {
        Self {
            luck: 2.0,
            secret_luck: 1.0,
            shiny_chance: 0.0,
            mythic_chance: 0.0,
            hatch_speed: 1.0,
            base_luck: 0.0,
            base_secret_luck: 0.0,
            base_shiny_chance: 1.0 / 40.0,
            base_mythic_chance: 1.0 / 100.0,
            base_hatch_speed: 0.0,
        }
    }
}

/// Knobs for hatch timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HatchConfig {
    /// Seconds one hatch takes at hatch speed 1.
    pub base_hatch_seconds: f64,
}

impl Default for HatchConfig {
    fn default() -> Self {
        Self {
            base_hatch_seconds: 4.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_json() {
        let config = EngineConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("cappedTierCeiling"));
        assert_eq!(EngineConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_hatch_seconds() {
        let err = EngineConfig::from_json_str(r#"{ "hatch": { "baseHatchSeconds": 0 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "hatch.baseHatchSeconds",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_low_ceiling() {
        let err = EngineConfig::from_json_str(r#"{ "probability": { "cappedTierCeiling": 0.5 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("cappedTierCeiling"));
    }

    #[test]
    fn test_rejects_non_positive_epsilon() {
        for epsilon in ["0", "-1e-15"] {
            let text = format!(r#"{{ "probability": {{ "redistributionEpsilon": {epsilon} }} }}"#);
            let err = EngineConfig::from_json_str(&text).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::OutOfRange {
                    field: "probability.redistributionEpsilon",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_partial_baseline_override() {
        let config =
            EngineConfig::from_json_str(r#"{ "stats": { "baseline": { "luck": 1.0 } } }"#).unwrap();
        assert_eq!(config.stats.baseline.luck, 1.0);
        assert_eq!(config.stats.baseline.hatch_speed, 1.0);
        assert_eq!(config.stats.luck_correction, 1.0);
    }
}
