//! Partition normalization.
//!
//! A partition is a set of items competing for one random draw. Turning
//! raw weights into final chances takes four steps:
//!
//! ```text
//! raw weights → base chances → tier boosts → redistribution → final chances
//! ```
//!
//! Only the capped tier's added mass is paid for by other items; top tiers
//! simply gain weight and the final renormalization absorbs it.

use crate::config::ProbabilityConfig;
use crate::numeric::{safe_divisor, REDISTRIBUTION_EPSILON};
use crate::probability::item::ProbabilityItem;
use crate::probability::tier::{LuckFactors, LuckRule};

/// Normalizes partitions under a fixed set of luck factors.
///
/// # Examples
///
/// ```rust
/// use hatchstat::probability::{LuckFactors, PartitionNormalizer, ProbabilityItem, Rarity};
///
/// let normalizer = PartitionNormalizer::new(LuckFactors::neutral());
/// let items = normalizer.normalize(vec![
///     ProbabilityItem::new("a", Rarity::Common, 3.0),
///     ProbabilityItem::new("b", Rarity::Common, 1.0),
/// ]);
///
/// assert_eq!(items[0].final_chance, 0.75);
/// assert_eq!(items[1].final_chance, 0.25);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNormalizer {
    luck: LuckFactors,
    epsilon: f64,
}

impl PartitionNormalizer {
    pub fn new(luck: LuckFactors) -> Self {
        Self {
            luck,
            epsilon: REDISTRIBUTION_EPSILON,
        }
    }

    /// Apply the configured tier ceiling and redistribution epsilon.
    pub fn from_config(luck: LuckFactors, config: &ProbabilityConfig) -> Self {
        Self {
            luck: luck.with_config(config),
            epsilon: config.redistribution_epsilon,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn luck(&self) -> &LuckFactors {
        &self.luck
    }

    /// Normalize one partition.
    ///
    /// An empty partition stays empty. For a non-empty one the returned
    /// `final_chance` values sum to 1 whenever any weight is positive.
    pub fn normalize(&self, items: Vec<ProbabilityItem>) -> Vec<ProbabilityItem> {
        if items.is_empty() {
            return items;
        }

        let mut items = normalize_weights(items);
        let increase = apply_tier_boosts(&mut items, &self.luck);
        if increase > 0.0 {
            let removed = redistribute_decrease(&mut items, increase, self.epsilon, |item| {
                item.rarity.donates_redistribution() && item.adjusted_weight > 0.0
            });
            tracing::trace!(increase, removed, "capped-tier boost redistributed");
        }
        finalize_chances(&mut items);
        items
    }
}

/// Normalize one partition under `luck` with the default epsilon.
pub fn normalize_partition(items: Vec<ProbabilityItem>, luck: &LuckFactors) -> Vec<ProbabilityItem> {
    PartitionNormalizer::new(*luck).normalize(items)
}

/// Rescale raw weights into base chances summing to 1.
///
/// A non-positive total is replaced by 1, so an all-zero partition keeps
/// zero chances instead of producing NaN. `adjusted_weight` starts equal to
/// `base_chance`.
pub fn normalize_weights(mut items: Vec<ProbabilityItem>) -> Vec<ProbabilityItem> {
    let total = safe_divisor(items.iter().map(|item| item.raw_weight).sum());
    for item in &mut items {
        item.base_chance = item.raw_weight / total;
        item.adjusted_weight = item.base_chance;
    }
    items
}

/// Scale each item's weight by its tier multiplier.
///
/// Returns the mass added to capped-tier items, which the caller must
/// take back from other items.
pub fn apply_tier_boosts(items: &mut [ProbabilityItem], luck: &LuckFactors) -> f64 {
    let mut capped_increase = 0.0;
    for item in items.iter_mut() {
        let multiplier = luck.multiplier_for(&item.rarity, item.ignore_secret);
        item.adjusted_weight = item.base_chance * multiplier;
        if item.rarity.luck_rule() == LuckRule::Capped {
            capped_increase += item.adjusted_weight - item.base_chance;
        }
    }
    capped_increase
}

/// Remove `amount` of weight from eligible items by water-filling.
///
/// Each round splits the remaining deficit evenly among the open items.
/// An item that cannot cover its share gives up everything it has and
/// closes; the next round spreads the shortfall over the rest. Rounds stop
/// once the deficit or the open set is exhausted, so no weight ever goes
/// negative.
///
/// Eligibility is decided once, before the first round. Returns the amount
/// actually removed, which equals `amount` unless the eligible items held
/// less weight than that.
///
/// # Examples
///
/// ```rust
/// use hatchstat::probability::{redistribute_decrease, ProbabilityItem, Rarity};
///
/// let mut items = vec![
///     ProbabilityItem::new("a", Rarity::Common, 0.0),
///     ProbabilityItem::new("b", Rarity::Common, 0.0),
/// ];
/// items[0].adjusted_weight = 0.1;
/// items[1].adjusted_weight = 0.9;
///
/// let removed = redistribute_decrease(&mut items, 0.4, 1e-15, |_| true);
/// assert!((removed - 0.4).abs() < 1e-12);
/// assert_eq!(items[0].adjusted_weight, 0.0);
/// assert!((items[1].adjusted_weight - 0.6).abs() < 1e-12);
/// ```
pub fn redistribute_decrease<F>(
    items: &mut [ProbabilityItem],
    amount: f64,
    epsilon: f64,
    is_eligible: F,
) -> f64
where
    F: Fn(&ProbabilityItem) -> bool,
{
    let mut open: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| is_eligible(item))
        .map(|(index, _)| index)
        .collect();

    let mut remaining = amount;
    let mut removed = 0.0;

    while remaining > epsilon && !open.is_empty() {
        let share = remaining / open.len() as f64;
        let mut consumed = 0.0;

        open.retain(|&index| {
            let item = &mut items[index];
            let decrease = share.min(item.adjusted_weight);
            item.adjusted_weight -= decrease;
            consumed += decrease;
            item.adjusted_weight > epsilon
        });

        if consumed == 0.0 {
            tracing::debug!(remaining, share, "deficit share underflowed");
            break;
        }
        remaining -= consumed;
        removed += consumed;
    }

    if remaining > epsilon {
        tracing::debug!(remaining, "eligible items exhausted before deficit was covered");
    }

    removed
}

/// Divide adjusted weights by their sum (or by 1 if the sum is not positive).
pub fn finalize_chances(items: &mut [ProbabilityItem]) {
    let total = safe_divisor(items.iter().map(|item| item.adjusted_weight).sum());
    for item in items.iter_mut() {
        item.final_chance = item.adjusted_weight / total;
    }
}
