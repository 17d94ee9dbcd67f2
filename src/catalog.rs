//! Built-in type definitions for the game data.
//!
//! [`builtin_registry`] describes every entity kind the game publishes and
//! [`bindings`] says which type each raw collection is normalized against.

use crate::normalize::FieldContext;
use crate::schema::{Condition, FieldDef, FieldType, SchemaRef, SchemaRegistry, TypeDef};
use serde_json::Value;

pub const DAILY_PERKS: &str = "dailyPerks";
pub const EGGS: &str = "eggs";
pub const INDEX: &str = "index";
pub const MASTERY: &str = "mastery";
pub const SECRET_BOUNTY: &str = "secretBounty";
pub const WORLDS: &str = "worlds";

/// Numeric stat fields and their defaults, in declaration order.
const STAT_FIELDS: &[(&str, f64)] = &[
    ("luck", 0.0),
    ("secretLuck", 0.0),
    ("infinityLuck", 0.0),
    ("shinyChance", 0.0),
    ("mythicChance", 0.0),
    ("hatchSpeed", 0.0),
    ("baseLuck", 0.0),
    ("baseSecretLuck", 0.0),
    ("baseInfinityLuck", 0.0),
    ("baseShinyChance", 0.0),
    ("baseMythicChance", 0.0),
    ("baseHatchSpeed", 0.0),
    ("luckMultiplier", 0.0),
    ("secretLuckMultiplier", 1.0),
    ("infinityLuckMultiplier", 1.0),
    ("shinyChanceMultiplier", 1.0),
    ("mythicChanceMultiplier", 1.0),
    ("hatchSpeedMultiplier", 0.0),
    ("potionLuckMultiplier", 0.0),
    ("potionSecretLuckMultiplier", 1.0),
    ("potionInfinityLuckMultiplier", 1.0),
    ("potionShinyChanceMultiplier", 1.0),
    ("potionMythicChanceMultiplier", 1.0),
    ("potionHatchSpeedMultiplier", 0.0),
];

/// A raw collection and the type it is normalized against.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub collection: &'static str,
    pub schema: SchemaRef,
}

impl Binding {
    pub fn new(collection: &'static str, schema: impl Into<SchemaRef>) -> Self {
        Self {
            collection,
            schema: schema.into(),
        }
    }
}

/// Collections loaded on every refresh.
pub fn bindings() -> Vec<Binding> {
    vec![
        Binding::new(DAILY_PERKS, "dailyPerksData"),
        Binding::new(EGGS, "egg"),
        Binding::new("enchants", ["stats", "id"]),
        Binding::new("environmentBuffs", "environmentBuff"),
        Binding::new("events", "event"),
        Binding::new("eventPotions", "potionGroup"),
        Binding::new("eventSpecialPotions", "potion"),
        Binding::new("eventUpgrades", "eventUpgrade"),
        Binding::new("gamepasses", "gamepass"),
        Binding::new(INDEX, "indexData"),
        Binding::new(MASTERY, "masteryData"),
        Binding::new("milestones", "milestone"),
        Binding::new("potions", "potionGroup"),
        Binding::new("rifts", ["stats", "id"]),
        Binding::new(SECRET_BOUNTY, "secretBountyData"),
        Binding::new("specialPotions", "potion"),
        Binding::new(WORLDS, "world"),
    ]
}

/// The game's type registry.
///
/// # Examples
///
/// ```rust
/// use hatchstat::catalog::builtin_registry;
/// use hatchstat::TypeName;
///
/// let registry = builtin_registry();
/// assert!(registry.validate().is_ok());
/// assert!(registry.contains(&TypeName::new("pet")));
/// ```
pub fn builtin_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new()
        .with_type("stats", stats_type())
        .with_type(
            "id",
            TypeDef::new()
                .field("id", FieldDef::string().required())
                .field("name", FieldDef::string().default_with(record_id)),
        )
        .with_type(
            "img",
            TypeDef::new()
                .extends("id")
                .field("imageDir", FieldDef::string().default_with(inherited_image_dir))
                .field("img", FieldDef::string().default_with(image_path)),
        )
        .with_type(
            "dailyPerk",
            TypeDef::new()
                .field("imageDir", FieldDef::string().default("perk"))
                .field("normal", FieldDef::object().default(empty_object()).schema("stats"))
                .field("premium", FieldDef::object().default(empty_object()).schema("stats"))
                .field("pets", FieldDef::array().default(empty_array()).schema("pet")),
        );

    let mut perks = TypeDef::new();
    for weekday in 0..7 {
        perks = perks.field(
            weekday.to_string(),
            FieldDef::object().default(empty_object()).schema("dailyPerk"),
        );
    }
    registry.register("dailyPerksData", perks);

    registry.register(
        "egg",
        TypeDef::new()
            .extends(["id", "img"])
            .field("imageDir", FieldDef::string().default("eggs"))
            .field("type", FieldDef::string().default("special"))
            .field(
                "world",
                FieldDef::string()
                    .default("the-overworld")
                    .when(Condition::field_eq("type", "world")),
            )
            .field(
                "includeInInfinity",
                FieldDef::array()
                    .default(empty_array())
                    .item_type(FieldType::String)
                    .when(Condition::field_ne("type", "infinity")),
            )
            .field("event", FieldDef::string().default("none"))
            .field("riftable", FieldDef::boolean().default(false))
            .field(
                "pets",
                FieldDef::array()
                    .default(empty_array())
                    .schema("pet")
                    .when(Condition::field_ne("type", "infinity")),
            )
            .field(
                "rarities",
                FieldDef::array()
                    .default(empty_array())
                    .schema("rarity")
                    .when(Condition::field_eq("type", "infinity")),
            ),
    );

    for name in ["environmentBuff", "event", "gamepass"] {
        registry.register(
            name,
            TypeDef::new()
                .extends(["stats", "id", "img"])
                .field("imageDir", FieldDef::string().default("icons")),
        );
    }

    registry.register(
        "eventUpgrade",
        TypeDef::new()
            .extends(["id", "img"])
            .field("imageDir", FieldDef::string().default("icons"))
            .field("event", FieldDef::string().default("none"))
            .field("levels", FieldDef::object().default(empty_object())),
    );
    registry.register(
        "indexData",
        TypeDef::new()
            .field("normal", FieldDef::object().schema("stats"))
            .field("shiny", FieldDef::object().schema("stats")),
    );
    registry.register(
        "masteryData",
        TypeDef::new()
            .field(
                "luckyStreak",
                FieldDef::array().default(empty_array()).schema(["stats", "id"]),
            )
            .field("fasterHatch", FieldDef::object().schema("stats"))
            .field("luckierTogether", FieldDef::object().schema("stats")),
    );
    registry.register(
        "milestone",
        TypeDef::new()
            .extends(["id", "img"])
            .field("imageDir", FieldDef::string().default("icons"))
            .field("tiers", FieldDef::array().default(empty_array()).schema("milestoneTier")),
    );
    registry.register(
        "milestoneTier",
        TypeDef::new().extends(["stats", "id"]).field(
            "img",
            FieldDef::string()
                .default_with(milestone_image_path)
                .when(Condition::field_ne("id", "none")),
        ),
    );
    registry.register(
        "pet",
        TypeDef::new()
            .extends(["id", "img"])
            .field("rarity", FieldDef::string().required())
            .field("imageDir", FieldDef::string().default_with(pet_image_dir))
            .field("baseChance", FieldDef::number().default(-1))
            .field("staticMythic", FieldDef::boolean().default(false))
            .field("hasMythic", FieldDef::boolean().default(true))
            .field("ignoreSecret", FieldDef::boolean().default(false)),
    );
    registry.register(
        "potion",
        TypeDef::new()
            .extends(["stats", "id", "img"])
            .field("event", FieldDef::string().default("none"))
            .field("imageDir", FieldDef::string().default("potions"))
            .field(
                "img",
                FieldDef::string()
                    .default_with(image_path)
                    .when(Condition::field_ne("id", "none")),
            ),
    );
    registry.register(
        "potionGroup",
        TypeDef::new()
            .extends(["id", "img"])
            .field("event", FieldDef::string().default("none"))
            .field("potions", FieldDef::array().default(empty_array()).schema("potion")),
    );
    registry.register(
        "rarity",
        TypeDef::new()
            .field("id", FieldDef::string().required())
            .field("rarity", FieldDef::string().default_with(record_id))
            .field("baseChance", FieldDef::number().default(-1)),
    );
    registry.register(
        "secretBountyData",
        TypeDef::new()
            .field("imageDir", FieldDef::string().default("bounty"))
            .field("pets", FieldDef::object().default(empty_object()).schema("pet").map())
            .field(
                "eggs",
                FieldDef::object()
                    .default(empty_object())
                    .schema("secretBountyEntry")
                    .map(),
            ),
    );
    registry.register(
        "secretBountyEntry",
        TypeDef::new()
            .field("pet", FieldDef::string().required())
            .field("egg", FieldDef::string().required())
            .field(
                "date",
                FieldDef::string().default_with(|ctx| ctx.key.map_or(Value::Null, Value::from)),
            ),
    );
    registry.register(
        "world",
        TypeDef::new()
            .extends(["id", "img"])
            .field("imageDir", FieldDef::string().default("worlds")),
    );

    registry
}

fn stats_type() -> TypeDef {
    let numbers = STAT_FIELDS
        .iter()
        .fold(TypeDef::new(), |def, (name, default)| {
            def.field(*name, FieldDef::number().default(*default))
        });
    numbers.field(
        "overwriteMythicChanceMultiplier",
        FieldDef::boolean().default(false),
    )
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn empty_array() -> Value {
    Value::Array(Vec::new())
}

fn record_id(ctx: &FieldContext<'_>) -> Value {
    ctx.record.get("id").cloned().unwrap_or(Value::Null)
}

fn inherited_image_dir(ctx: &FieldContext<'_>) -> Value {
    let dir = ctx
        .record_str("imageDir")
        .or_else(|| ctx.parent_str("imageDir"))
        .unwrap_or("unknown");
    Value::from(dir)
}

fn image_path(ctx: &FieldContext<'_>) -> Value {
    Value::from(format!(
        "assets/images/{}/{}",
        ctx.record_str("imageDir").unwrap_or_default(),
        ctx.record_str("id").unwrap_or_default()
    ))
}

/// Milestone tiers share the image of their milestone: `world-3` uses `world`.
fn milestone_image_path(ctx: &FieldContext<'_>) -> Value {
    let id = ctx.record_str("id").unwrap_or_default();
    let stem = id.split('-').next().unwrap_or_default();
    Value::from(format!("assets/images/milestones/{stem}"))
}

/// Pets live in a directory named after the egg (or bounty) listing them.
fn pet_image_dir(ctx: &FieldContext<'_>) -> Value {
    match ctx.parent_str("id").or_else(|| ctx.parent_str("imageDir")) {
        Some(owner) => Value::from(format!("pets/{owner}")),
        None => Value::from("pets"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::TypeName;
    use crate::schema::SchemaResolver;
    use std::sync::Arc;

    #[test]
    fn test_registry_is_consistent() {
        let registry = builtin_registry();
        assert!(registry.validate().is_ok());
        assert_eq!(registry.len(), 21);
    }

    #[test]
    fn test_every_binding_names_a_known_type() {
        let registry = builtin_registry();
        for binding in bindings() {
            for name in binding.schema.names() {
                assert!(registry.contains(name), "{} -> {name}", binding.collection);
            }
        }
    }

    #[test]
    fn test_egg_field_order() {
        let resolver = SchemaResolver::new(Arc::new(builtin_registry()));
        let egg = resolver.resolve(&TypeName::new("egg"));
        assert_eq!(
            egg.field_names(),
            vec![
                "id",
                "name",
                "imageDir",
                "img",
                "type",
                "world",
                "includeInInfinity",
                "event",
                "riftable",
                "pets",
                "rarities"
            ]
        );
    }

    #[test]
    fn test_stats_fields() {
        let resolver = SchemaResolver::new(Arc::new(builtin_registry()));
        let stats = resolver.resolve(&TypeName::new("stats"));
        assert_eq!(stats.len(), STAT_FIELDS.len() + 1);
    }
}
