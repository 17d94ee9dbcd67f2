//! Hatch odds example: raw game data to per-pet odds
//!
//! This example demonstrates:
//! - Normalizing raw JSON with the built-in game types
//! - Composing player stats from the dataset's bonuses
//! - Turning an egg's pets into odds, variant chances and hatch times
//!
//! Run with `RUST_LOG=hatchstat=debug` to see what normalization drops.

use hatchstat::catalog::{bindings, builtin_registry};
use hatchstat::probability::{hatch_time, pets_to_display, variant_chances, PartitionNormalizer};
use hatchstat::stats::StatInputs;
use hatchstat::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn raw_game_data() -> Value {
    json!({
        "eggs": [{
            "id": "spotted-egg",
            "type": "world",
            "pets": [
                {"id": "doggy", "rarity": "common", "baseChance": 70},
                {"id": "kitty", "rarity": "unique", "baseChance": 25},
                {"id": "bunny", "rarity": "epic", "baseChance": 4.9},
                {"id": "dragon", "rarity": "legendary", "baseChance": 0.099},
                {"id": "king-doggy", "rarity": "secret", "baseChance": 0.001},
                {"id": "doggy", "rarity": "common", "baseChance": 99},
                {"name": "pet without an id"}
            ]
        }],
        "index": {
            "normal": {"luck": 0.5},
            "shiny": {"shinyChanceMultiplier": 1.5}
        },
        "mastery": {
            "fasterHatch": {"hatchSpeed": 0.1},
            "luckierTogether": {"luck": 0.05}
        }
    })
}

fn main() -> Result<(), SchemaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = EngineConfig::default();
    let registry = builtin_registry();
    registry.validate()?;

    let resolver = SchemaResolver::new(Arc::new(registry));
    let normalizer = Normalizer::from_config(&resolver, &config);
    let Value::Object(raw) = raw_game_data() else {
        unreachable!("raw game data is an object literal")
    };
    let dataset = Dataset::refresh(&normalizer, &raw, &bindings());
    println!("Normalized collections: {}", dataset.names().join(", "));

    // Player setup
    let mut inputs = StatInputs::new(&[]);
    inputs.index = dataset.index();
    inputs.mastery = dataset.mastery();
    inputs.toggles.world_normal = true;
    inputs.toggles.world_shiny = true;
    inputs.toggles.faster_hatch_mastery = true;
    inputs.knobs.shrine_blessing = 25.0;
    inputs.knobs.season_stars = 600.0;
    inputs.knobs.luckier_together = 3.0;
    inputs.knobs.eggs_per_hatch = 3.0;

    let stats = compose_stats(&inputs, &config.stats);
    println!("\n=== Player Stats ===");
    println!("Luck:         {:.3}", stats.luck);
    println!("Secret luck:  {:.3}", stats.secret_luck);
    println!("Shiny chance: {:.4}", stats.shiny_chance);
    println!("Mythic:       {:.4}", stats.mythic_chance);
    println!("Hatch speed:  {:.3}", stats.hatch_speed);

    let partition = PartitionNormalizer::from_config(stats.luck_factors(), &config.probability);
    let odds = pets_to_display("spotted-egg", "the-overworld", &partition, dataset.eggs());

    println!("\n=== Spotted Egg ===");
    for pet in &odds {
        let variants = variant_chances(pet, stats.variant_rates());
        let seconds = hatch_time(pet.final_chance, &stats, &config.hatch);
        println!(
            "{:<12} {:<10} base {:>8.4}%  final {:>8.4}%  shiny {:>9.6}%  mythic {:>9.6}%  ~{:.0}s",
            pet.id,
            pet.rarity.as_str(),
            pet.base_chance * 100.0,
            pet.final_chance * 100.0,
            variants.shiny * 100.0,
            variants.mythic * 100.0,
            seconds,
        );
    }

    let total: f64 = odds.iter().map(|pet| pet.final_chance).sum();
    println!("\nTotal: {:.6}", total);

    Ok(())
}
