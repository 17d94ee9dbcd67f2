//! Egg odds.
//!
//! Regular eggs list their pets directly. Infinity eggs list rarity rows
//! instead and draw their members from every egg of the selected world.

use crate::normalize::Entity;
use crate::probability::item::ProbabilityItem;
use crate::probability::partition::PartitionNormalizer;
use serde_json::Value;
use std::collections::HashSet;

const INFINITY_EGG_TYPE: &str = "infinity";

/// Compute the displayed odds of every pet in one egg.
///
/// Returns an empty list when no egg has `egg_id`, or when an infinity egg
/// has no rarity rows or no eggs in `world_id`. The result is sorted with
/// [`sort_by_rarity`].
///
/// # Examples
///
/// ```rust
/// use hatchstat::probability::{pets_to_display, LuckFactors, PartitionNormalizer};
/// use serde_json::{json, Value};
///
/// let Value::Object(egg) = json!({
///     "id": "common-egg",
///     "type": "world",
///     "world": "the-overworld",
///     "pets": [
///         {"id": "doggy", "rarity": "common", "baseChance": 3.0},
///         {"id": "kitty", "rarity": "common", "baseChance": 1.0}
///     ]
/// }) else { unreachable!() };
///
/// let normalizer = PartitionNormalizer::new(LuckFactors::neutral());
/// let pets = pets_to_display("common-egg", "the-overworld", &normalizer, &[egg]);
/// assert_eq!(pets[0].id, "doggy");
/// assert_eq!(pets[0].final_chance, 0.75);
/// ```
pub fn pets_to_display(
    egg_id: &str,
    world_id: &str,
    normalizer: &PartitionNormalizer,
    eggs: &[Entity],
) -> Vec<ProbabilityItem> {
    let Some(egg) = eggs.iter().find(|egg| str_field(egg, "id") == Some(egg_id)) else {
        tracing::debug!(egg_id, "unknown egg");
        return Vec::new();
    };

    let mut pets = if str_field(egg, "type") == Some(INFINITY_EGG_TYPE) {
        let world_eggs: Vec<&Entity> = eggs
            .iter()
            .filter(|candidate| str_field(candidate, "world") == Some(world_id))
            .collect();
        let rows = items_of(egg.get("rarities"));
        if rows.is_empty() || world_eggs.is_empty() {
            tracing::debug!(egg_id, world_id, "infinity egg has nothing to draw from");
            return Vec::new();
        }
        normalizer.normalize_hierarchical(rows, world_pets(&world_eggs))
    } else {
        normalizer.normalize(items_of(egg.get("pets")))
    };

    sort_by_rarity(&mut pets);
    pets
}

/// Order by rarity rank, then by descending final chance.
///
/// The sort is stable, so ties keep their input order.
pub fn sort_by_rarity(items: &mut [ProbabilityItem]) {
    items.sort_by(|a, b| {
        a.rarity
            .cmp_rank(&b.rarity)
            .then_with(|| b.final_chance.total_cmp(&a.final_chance))
    });
}

/// A secret-bounty pet placed into one egg.
#[derive(Debug, Clone, Copy)]
pub struct BountyPlacement<'a> {
    pub egg_id: &'a str,
    pub pet: &'a Entity,
}

/// Look up the bounty placement for `date_key` (`YYYYMMDD`) in normalized
/// secret-bounty data.
///
/// Returns `None` when there is no entry for the date or the entry names a
/// pet that is not listed.
pub fn bounty_for_date<'a>(bounty_data: &'a Entity, date_key: &str) -> Option<BountyPlacement<'a>> {
    let entry = bounty_data.get("eggs")?.get(date_key)?.as_object()?;
    let pet_id = str_field(entry, "pet")?;
    let egg_id = str_field(entry, "egg")?;
    let pet = bounty_data.get("pets")?.get(pet_id)?.as_object()?;
    Some(BountyPlacement { egg_id, pet })
}

/// Add rotating pets to copies of `eggs`.
///
/// Every egg receives each of `perk_pets`; the bounty pet goes only to its
/// target egg. A pet whose id an egg already lists is not added again.
/// Inputs are left untouched.
pub fn inject_pets(
    eggs: &[Entity],
    perk_pets: &[Entity],
    bounty: Option<BountyPlacement<'_>>,
) -> Vec<Entity> {
    let mut injected = eggs.to_vec();

    if !perk_pets.is_empty() {
        for egg in &mut injected {
            for pet in perk_pets {
                push_pet(egg, pet);
            }
        }
    }

    if let Some(bounty) = bounty {
        match injected
            .iter_mut()
            .find(|egg| str_field(egg, "id") == Some(bounty.egg_id))
        {
            Some(egg) => push_pet(egg, bounty.pet),
            None => tracing::debug!(egg_id = bounty.egg_id, "bounty target egg not found"),
        }
    }

    injected
}

fn push_pet(egg: &mut Entity, pet: &Entity) {
    let pets = egg
        .entry("pets")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !pets.is_array() {
        *pets = Value::Array(Vec::new());
    }
    let Value::Array(pets) = pets else {
        return;
    };

    let id = str_field(pet, "id");
    let present = pets
        .iter()
        .any(|existing| existing.get("id").and_then(Value::as_str) == id);
    if !present {
        pets.push(Value::Object(pet.clone()));
    }
}

/// Pets of all `eggs`, keeping the first occurrence of each id.
fn world_pets(eggs: &[&Entity]) -> Vec<ProbabilityItem> {
    let mut seen = HashSet::new();
    eggs.iter()
        .flat_map(|egg| items_of(egg.get("pets")))
        .filter(|pet| seen.insert(pet.id.clone()))
        .collect()
}

fn items_of(list: Option<&Value>) -> Vec<ProbabilityItem> {
    list.and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .filter_map(ProbabilityItem::from_entity)
                .collect()
        })
        .unwrap_or_default()
}

fn str_field<'a>(entity: &'a Entity, field: &str) -> Option<&'a str> {
    entity.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{approx_eq, PROBABILITY_TOLERANCE};
    use crate::probability::tier::{LuckFactors, Rarity};
    use serde_json::json;

    fn entity(value: Value) -> Entity {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn world_eggs() -> Vec<Entity> {
        vec![
            entity(json!({
                "id": "spotted", "type": "world", "world": "the-overworld",
                "pets": [
                    {"id": "doggy", "rarity": "common", "baseChance": 0.9},
                    {"id": "dragon", "rarity": "legendary", "baseChance": 0.1}
                ]
            })),
            entity(json!({
                "id": "iceshard", "type": "world", "world": "the-overworld",
                "pets": [
                    {"id": "doggy", "rarity": "common", "baseChance": 0.5},
                    {"id": "ice-kitty", "rarity": "common", "baseChance": 0.5}
                ]
            })),
            entity(json!({
                "id": "void", "type": "world", "world": "minigame-paradise",
                "pets": [{"id": "void-bat", "rarity": "common", "baseChance": 1.0}]
            })),
            entity(json!({
                "id": "infinity", "type": "infinity",
                "rarities": [
                    {"id": "common", "rarity": "common", "baseChance": 0.9},
                    {"id": "legendary", "rarity": "legendary", "baseChance": 0.1},
                    {"id": "secret", "rarity": "secret", "baseChance": 0.001}
                ]
            })),
        ]
    }

    #[test]
    fn test_unknown_egg_is_empty() {
        let normalizer = PartitionNormalizer::new(LuckFactors::neutral());
        assert!(pets_to_display("nope", "the-overworld", &normalizer, &world_eggs()).is_empty());
    }

    #[test]
    fn test_infinity_egg_draws_from_world() {
        let normalizer = PartitionNormalizer::new(LuckFactors::neutral());
        let pets = pets_to_display("infinity", "the-overworld", &normalizer, &world_eggs());

        let ids: Vec<&str> = pets.iter().map(|p| p.id.as_str()).collect();
        // doggy appears once, the other world's bat never
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&"void-bat"));

        // secret row has no members, so the two real rows share 1 - secret
        let total: f64 = pets.iter().map(|p| p.final_chance).sum();
        assert!(total < 1.0);
        assert_eq!(pets.last().map(|p| p.rarity.clone()), Some(Rarity::Legendary));
    }

    #[test]
    fn test_infinity_egg_without_world_eggs() {
        let normalizer = PartitionNormalizer::new(LuckFactors::neutral());
        assert!(pets_to_display("infinity", "nowhere", &normalizer, &world_eggs()).is_empty());
    }

    #[test]
    fn test_regular_egg_sums_to_one() {
        let normalizer = PartitionNormalizer::new(LuckFactors::new(3.0, 2.0));
        let pets = pets_to_display("spotted", "the-overworld", &normalizer, &world_eggs());
        let total: f64 = pets.iter().map(|p| p.final_chance).sum();
        assert!(approx_eq(total, 1.0, PROBABILITY_TOLERANCE));
        assert_eq!(pets[0].id, "doggy");
    }

    #[test]
    fn test_sort_by_rarity_then_chance() {
        let mut items = vec![
            ProbabilityItem::new("s", Rarity::Secret, 1.0),
            ProbabilityItem::new("x", Rarity::parse("shadow"), 1.0),
            ProbabilityItem::new("c1", Rarity::Common, 1.0),
            ProbabilityItem::new("c2", Rarity::Common, 1.0),
        ];
        items[2].final_chance = 0.1;
        items[3].final_chance = 0.6;
        sort_by_rarity(&mut items);
        let ids: Vec<&str> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c1", "s", "x"]);
    }

    #[test]
    fn test_inject_pets_skips_duplicates() {
        let eggs = world_eggs();
        let perk = vec![
            entity(json!({"id": "doggy", "rarity": "common"})),
            entity(json!({"id": "perk-cat", "rarity": "legendary"})),
        ];
        let out = inject_pets(&eggs, &perk, None);

        let spotted = out[0]["pets"].as_array().unwrap();
        assert_eq!(spotted.len(), 3);
        assert_eq!(spotted[2]["id"], json!("perk-cat"));
        // inputs untouched
        assert_eq!(eggs[0]["pets"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_bounty_goes_to_target_egg_only() {
        let bounty_data = entity(json!({
            "pets": {"king": {"id": "king", "rarity": "secret"}},
            "eggs": {"20261017": {"pet": "king", "egg": "iceshard", "date": "20261017"}}
        }));
        let bounty = bounty_for_date(&bounty_data, "20261017");
        assert_eq!(bounty.map(|b| b.egg_id), Some("iceshard"));

        let out = inject_pets(&world_eggs(), &[], bounty);
        assert_eq!(out[0]["pets"].as_array().unwrap().len(), 2);
        assert_eq!(out[1]["pets"].as_array().unwrap().len(), 3);
        assert!(bounty_for_date(&bounty_data, "20261018").is_none());
    }
}
