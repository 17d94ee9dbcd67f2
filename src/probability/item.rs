//! Probability items.

use crate::normalize::Entity;
use crate::probability::tier::Rarity;
use serde::Serialize;
use serde_json::Value;

/// One competing outcome in a partition.
///
/// Items only exist while odds are computed; `record` carries the
/// normalized entity the item was built from so callers can display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityItem {
    pub id: String,
    pub rarity: Rarity,
    /// Unnormalized input weight, never negative.
    pub raw_weight: f64,
    /// Share after the first normalization pass.
    pub base_chance: f64,
    /// Weight after tier boosting and redistribution.
    pub adjusted_weight: f64,
    pub final_chance: f64,
    /// Opts out of the secondary luck factor.
    pub ignore_secret: bool,
    /// Opts out of the mythic variant when false.
    pub has_mythic: bool,
    pub record: Entity,
}

impl ProbabilityItem {
    /// Create an item with a raw weight; negative or NaN weights become zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hatchstat::probability::{ProbabilityItem, Rarity};
    ///
    /// let item = ProbabilityItem::new("doggy", Rarity::Common, -1.0);
    /// assert_eq!(item.raw_weight, 0.0);
    /// assert!(item.has_mythic);
    /// ```
    pub fn new(id: impl Into<String>, rarity: Rarity, weight: f64) -> Self {
        Self {
            id: id.into(),
            rarity,
            raw_weight: sanitize_weight(weight),
            base_chance: 0.0,
            adjusted_weight: 0.0,
            final_chance: 0.0,
            ignore_secret: false,
            has_mythic: true,
            record: Entity::new(),
        }
    }

    pub fn ignoring_secret(mut self) -> Self {
        self.ignore_secret = true;
        self
    }

    pub fn without_mythic(mut self) -> Self {
        self.has_mythic = false;
        self
    }

    /// Build an item from a normalized pet or rarity entity.
    ///
    /// Reads `id` (required), `rarity` (default common), `baseChance`
    /// (default 0), `ignoreSecret` and `hasMythic`. Returns `None` when the
    /// entity has no string id.
    pub fn from_entity(entity: &Entity) -> Option<Self> {
        let id = entity.get("id").and_then(Value::as_str)?;
        let rarity = entity
            .get("rarity")
            .and_then(Value::as_str)
            .map(Rarity::parse)
            .unwrap_or_default();
        let weight = entity
            .get("baseChance")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        let mut item = Self::new(id, rarity, weight);
        item.ignore_secret = entity
            .get("ignoreSecret")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        item.has_mythic = entity
            .get("hasMythic")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        item.record = entity.clone();
        Some(item)
    }
}

fn sanitize_weight(weight: f64) -> f64 {
    if weight > 0.0 && weight.is_finite() {
        weight
    } else {
        0.0
    }
}
