//! Property-based tests.
//!
//! - Partitions: final chances sum to 1 and redistribution conserves mass
//! - Resolution: terminates and is deterministic for arbitrary `extends` graphs
//! - Normalization: repeatable, a fixpoint, and first-wins on identities
//! - Stats: the first overwrite decides the mythic multiplier

use hatchstat::catalog::builtin_registry;
use hatchstat::normalize::Normalizer;
use hatchstat::numeric::{approx_eq, PROBABILITY_TOLERANCE};
use hatchstat::probability::{
    apply_tier_boosts, normalize_partition, normalize_weights, redistribute_decrease, LuckFactors,
    ProbabilityItem, Rarity,
};
use hatchstat::schema::{FieldDef, SchemaRegistry, SchemaResolver, TypeDef};
use hatchstat::stats::{FieldBag, Stat, StatTotals};
use hatchstat::TypeName;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn rarity_strategy() -> impl Strategy<Value = Rarity> {
    prop::sample::select(vec![
        Rarity::Common,
        Rarity::Unique,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Secret,
        Rarity::Infinity,
        Rarity::parse("shadow"),
    ])
}

fn lower_rarity_strategy() -> impl Strategy<Value = Rarity> {
    prop::sample::select(vec![Rarity::Common, Rarity::Unique, Rarity::Rare, Rarity::Epic])
}

fn items_from(specs: Vec<(Rarity, f64)>) -> Vec<ProbabilityItem> {
    specs
        .into_iter()
        .enumerate()
        .map(|(i, (rarity, weight))| ProbabilityItem::new(format!("pet-{i}"), rarity, weight))
        .collect()
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1000.0f64..1000.0).prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

fn raw_pet_strategy() -> impl Strategy<Value = Value> {
    (
        prop::option::of("[a-c]{1,2}"),
        prop::option::of(prop::sample::select(vec!["common", "epic", "secret"])),
        scalar_strategy(),
        scalar_strategy(),
        scalar_strategy(),
    )
        .prop_map(|(id, rarity, base_chance, has_mythic, extra)| {
            let mut record = Map::new();
            if let Some(id) = id {
                record.insert("id".into(), json!(id));
            }
            if let Some(rarity) = rarity {
                record.insert("rarity".into(), json!(rarity));
            }
            record.insert("baseChance".into(), base_chance);
            record.insert("hasMythic".into(), has_mythic);
            record.insert("extra".into(), extra);
            Value::Object(record)
        })
}

// =============================================================================
// PARTITION PROPERTIES
// =============================================================================

mod partition_properties {
    use super::*;

    proptest! {
        /// Any partition with positive weight sums to 1.
        #[test]
        fn final_chances_sum_to_one(
            specs in prop::collection::vec((rarity_strategy(), 0.001f64..100.0), 1..24),
            luck in 0.0f64..20.0,
            secret_luck in 0.5f64..5.0,
        ) {
            let items = normalize_partition(items_from(specs), &LuckFactors::new(luck, secret_luck));
            let total: f64 = items.iter().map(|i| i.final_chance).sum();
            prop_assert!(approx_eq(total, 1.0, PROBABILITY_TOLERANCE), "total was {}", total);
            prop_assert!(items.iter().all(|i| i.final_chance >= 0.0));
        }

        /// Redistribution removes exactly the boost, or everything donors had.
        #[test]
        fn redistribution_conserves_mass(
            specs in prop::collection::vec((lower_rarity_strategy(), 0.0f64..10.0), 1..24),
            luck in 0.0f64..10.0,
        ) {
            let mut items = normalize_weights(items_from(specs));
            let base_total: f64 = items.iter().map(|i| i.base_chance).sum();
            let capacity: f64 = items
                .iter()
                .filter(|i| i.rarity.donates_redistribution())
                .map(|i| i.base_chance)
                .sum();

            let increase = apply_tier_boosts(&mut items, &LuckFactors::new(luck, 1.0));
            let removed = redistribute_decrease(&mut items, increase, 1e-15, |i| {
                i.rarity.donates_redistribution() && i.adjusted_weight > 0.0
            });

            prop_assert!(approx_eq(removed, increase.min(capacity), PROBABILITY_TOLERANCE));
            prop_assert!(items.iter().all(|i| i.adjusted_weight >= 0.0));

            let adjusted_total: f64 = items.iter().map(|i| i.adjusted_weight).sum();
            prop_assert!(approx_eq(
                adjusted_total,
                base_total + increase - removed,
                PROBABILITY_TOLERANCE
            ));
            if increase <= capacity {
                prop_assert!(approx_eq(adjusted_total, base_total, PROBABILITY_TOLERANCE));
            }
        }

        /// Empty partitions stay empty under any luck.
        #[test]
        fn empty_partition_is_empty(luck in 0.0f64..100.0) {
            prop_assert!(normalize_partition(Vec::new(), &LuckFactors::new(luck, 2.0)).is_empty());
        }
    }
}

// =============================================================================
// RESOLUTION PROPERTIES
// =============================================================================

mod resolution_properties {
    use super::*;

    fn registry_from(parents: &[Vec<usize>]) -> SchemaRegistry {
        let count = parents.len();
        let mut registry = SchemaRegistry::new();
        for (i, extends) in parents.iter().enumerate() {
            let names: Vec<TypeName> = extends
                .iter()
                .map(|p| TypeName::new(&format!("t{}", p % count)))
                .collect();
            let def = TypeDef::new()
                .extends(names)
                .field(format!("own{i}"), FieldDef::number())
                .field("shared", FieldDef::string().default(format!("t{i}")));
            registry.register(format!("t{i}"), def);
        }
        registry
    }

    proptest! {
        /// Arbitrary (possibly cyclic) graphs resolve, deterministically,
        /// and every type keeps its own fields.
        #[test]
        fn resolution_terminates_and_is_deterministic(
            parents in prop::collection::vec(prop::collection::vec(0usize..8, 0..4), 1..8),
        ) {
            let registry = Arc::new(registry_from(&parents));

            let first = SchemaResolver::new(Arc::clone(&registry));
            let second = SchemaResolver::new(Arc::clone(&registry));

            for i in 0..parents.len() {
                let name = TypeName::new(&format!("t{i}"));
                let a = first.resolve(&name);
                let b = second.resolve(&name);
                prop_assert_eq!(a.field_names(), b.field_names());

                let own = format!("own{i}");
                prop_assert!(a.get(&own).is_some());
                // own fields override every ancestor
                let shared = a.get("shared").and_then(|f| f.default.clone());
                let expected_shared = format!("t{i}");
                prop_assert!(matches!(
                    shared,
                    Some(hatchstat::schema::FieldDefault::Literal(Value::String(ref s))) if s == &expected_shared
                ));
            }
        }
    }
}

// =============================================================================
// NORMALIZATION PROPERTIES
// =============================================================================

mod normalization_properties {
    use super::*;

    proptest! {
        /// Normalizing the same input twice gives the same output, and
        /// normalizing that output again changes nothing.
        #[test]
        fn normalization_is_idempotent(
            pets in prop::collection::vec(raw_pet_strategy(), 0..12),
        ) {
            let resolver = SchemaResolver::new(Arc::new(builtin_registry()));
            let normalizer = Normalizer::new(&resolver);
            let raw = Value::Array(pets);

            let once = normalizer.normalize_value(&raw, &"pet".into());
            let again = normalizer.normalize_value(&raw, &"pet".into());
            prop_assert_eq!(&once, &again);

            let twice = normalizer.normalize_value(&once, &"pet".into());
            prop_assert_eq!(once, twice);
        }

        /// The first record carrying an id wins; order is preserved.
        #[test]
        fn first_identity_wins(ids in prop::collection::vec("[a-d]", 0..20)) {
            let registry = SchemaRegistry::new().with_type(
                "row",
                TypeDef::new()
                    .field("id", FieldDef::string().required())
                    .field("position", FieldDef::number()),
            );
            let resolver = SchemaResolver::new(Arc::new(registry));
            let normalizer = Normalizer::new(&resolver);

            let raw: Vec<Value> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| json!({"id": id, "position": i}))
                .collect();
            let out = normalizer.normalize_value(&Value::Array(raw), &"row".into());

            let mut seen = HashSet::new();
            let expected: Vec<Value> = ids
                .iter()
                .enumerate()
                .filter(|(_, id)| seen.insert(id.as_str()))
                .map(|(i, id)| json!({"id": id, "position": i}))
                .collect();
            prop_assert_eq!(out, Value::Array(expected));
        }
    }
}

// =============================================================================
// STAT PROPERTIES
// =============================================================================

mod stat_properties {
    use super::*;

    proptest! {
        /// The first overwrite sets the mythic multiplier for good; without
        /// one, contributions compound.
        #[test]
        fn first_overwrite_decides(
            contributions in prop::collection::vec((0.5f64..4.0, any::<bool>()), 0..10),
        ) {
            let mut totals = StatTotals::neutral();
            for (value, overwrite) in &contributions {
                totals.accumulate(
                    &FieldBag::new()
                        .with("mythicChanceMultiplier", *value)
                        .with("overwriteMythicChanceMultiplier", *overwrite),
                );
            }

            let mut expected = 1.0;
            for (value, overwrite) in &contributions {
                if *overwrite {
                    expected = *value;
                    break;
                }
                expected *= value;
            }

            let mythic = totals.get(Stat::MythicChance);
            prop_assert!(approx_eq(mythic.multiplier, expected, 1e-9));
            prop_assert_eq!(mythic.overwritten, contributions.iter().any(|(_, o)| *o));
        }
    }
}
