//! Two-level partitions.
//!
//! An outer row (a rarity tier) is drawn first, then a member inside that
//! row. The outer rows go through the full partition pipeline; members only
//! share their row's chance.

use crate::probability::item::ProbabilityItem;
use crate::probability::partition::{normalize_weights, PartitionNormalizer};
use crate::probability::tier::{LuckFactors, Rarity};
use std::collections::HashMap;

impl PartitionNormalizer {
    /// Normalize a hierarchical partition.
    ///
    /// `groups` are the outer rows, matched to `members` by rarity. Inside a
    /// row every member gets `row.final_chance × share`, where the share is
    /// its weight over the row's total weight, or an even split when the
    /// row's weights are all zero. Rows without members are skipped, so the
    /// result can sum to less than 1.
    ///
    /// Members keep their input order within a row; rows keep the order of
    /// `groups`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hatchstat::probability::{LuckFactors, PartitionNormalizer, ProbabilityItem, Rarity};
    ///
    /// let normalizer = PartitionNormalizer::new(LuckFactors::neutral());
    /// let out = normalizer.normalize_hierarchical(
    ///     vec![
    ///         ProbabilityItem::new("common", Rarity::Common, 0.8),
    ///         ProbabilityItem::new("rare", Rarity::Rare, 0.2),
    ///     ],
    ///     vec![
    ///         ProbabilityItem::new("a", Rarity::Common, 1.0),
    ///         ProbabilityItem::new("b", Rarity::Common, 3.0),
    ///         ProbabilityItem::new("c", Rarity::Rare, 0.0),
    ///     ],
    /// );
    ///
    /// let chances: Vec<f64> = out.iter().map(|p| p.final_chance).collect();
    /// assert!((chances[0] - 0.2).abs() < 1e-12);
    /// assert!((chances[1] - 0.6).abs() < 1e-12);
    /// assert!((chances[2] - 0.2).abs() < 1e-12);
    /// ```
    pub fn normalize_hierarchical(
        &self,
        groups: Vec<ProbabilityItem>,
        members: Vec<ProbabilityItem>,
    ) -> Vec<ProbabilityItem> {
        let groups = self.normalize(groups);

        let mut by_rarity: HashMap<Rarity, Vec<ProbabilityItem>> = HashMap::new();
        for member in members {
            by_rarity.entry(member.rarity.clone()).or_default().push(member);
        }

        let mut results = Vec::new();
        for group in &groups {
            let Some(row) = by_rarity.get(&group.rarity).filter(|row| !row.is_empty()) else {
                tracing::trace!(rarity = %group.rarity, "no members for row, skipping");
                continue;
            };

            let even_share = 1.0 / row.len() as f64;
            let row = normalize_weights(row.clone());
            let weighted = row.iter().any(|member| member.base_chance > 0.0);

            for mut member in row {
                let share = if weighted { member.base_chance } else { even_share };
                member.final_chance = group.final_chance * share;
                results.push(member);
            }
        }
        results
    }
}

/// Normalize a hierarchical partition under `luck` with the default epsilon.
pub fn normalize_hierarchical(
    groups: Vec<ProbabilityItem>,
    members: Vec<ProbabilityItem>,
    luck: &LuckFactors,
) -> Vec<ProbabilityItem> {
    PartitionNormalizer::new(*luck).normalize_hierarchical(groups, members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{approx_eq, PROBABILITY_TOLERANCE};

    fn item(id: &str, rarity: Rarity, weight: f64) -> ProbabilityItem {
        ProbabilityItem::new(id, rarity, weight)
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let out = normalize_hierarchical(
            vec![item("common", Rarity::Common, 0.5), item("epic", Rarity::Epic, 0.5)],
            vec![item("a", Rarity::Common, 1.0)],
            &LuckFactors::neutral(),
        );
        assert_eq!(out.len(), 1);
        assert!(approx_eq(out[0].final_chance, 0.5, PROBABILITY_TOLERANCE));
    }

    #[test]
    fn test_zero_weight_row_splits_evenly() {
        let out = normalize_hierarchical(
            vec![item("secret", Rarity::Secret, 1.0)],
            vec![
                item("a", Rarity::Secret, 0.0),
                item("b", Rarity::Secret, 0.0),
                item("c", Rarity::Secret, 0.0),
                item("d", Rarity::Secret, 0.0),
            ],
            &LuckFactors::neutral(),
        );
        assert!(out.iter().all(|p| approx_eq(p.final_chance, 0.25, PROBABILITY_TOLERANCE)));
    }

    #[test]
    fn test_outer_rows_are_boosted() {
        // legendary row doubles from 0.5 to 1.0, renormalized over 1.5
        let out = normalize_hierarchical(
            vec![
                item("common", Rarity::Common, 0.5),
                item("legendary", Rarity::Legendary, 0.5),
            ],
            vec![item("c", Rarity::Common, 1.0), item("l", Rarity::Legendary, 1.0)],
            &LuckFactors::new(1.0, 1.0),
        );
        assert!(approx_eq(out[0].final_chance, 1.0 / 3.0, PROBABILITY_TOLERANCE));
        assert!(approx_eq(out[1].final_chance, 2.0 / 3.0, PROBABILITY_TOLERANCE));
    }

    #[test]
    fn test_full_rows_sum_to_one() {
        let out = normalize_hierarchical(
            vec![item("common", Rarity::Common, 0.9), item("epic", Rarity::Epic, 0.1)],
            vec![
                item("a", Rarity::Common, 2.0),
                item("b", Rarity::Common, 5.0),
                item("c", Rarity::Epic, 1.0),
                item("d", Rarity::Epic, 4.0),
            ],
            &LuckFactors::new(2.0, 1.0),
        );
        let total: f64 = out.iter().map(|p| p.final_chance).sum();
        assert!(approx_eq(total, 1.0, PROBABILITY_TOLERANCE));
    }

    #[test]
    fn test_no_groups() {
        assert!(normalize_hierarchical(Vec::new(), vec![item("a", Rarity::Common, 1.0)], &LuckFactors::neutral()).is_empty());
    }
}
