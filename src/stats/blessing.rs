//! Level-derived modifier sources.

use crate::numeric::clamp_or_min;
use crate::stats::source::FieldBag;

pub const MAX_BLESSING_LEVEL: f64 = 50.0;
pub const MAX_SEASON_STARS: f64 = 1500.0;

/// Shrine bubble blessing.
///
/// From level 1 it grants luck rising linearly from 0.15 to 1.5 at level 50
/// and one base hatch speed; from level 20 another 0.05 to 0.25 base hatch
/// speed is added. Levels are clamped to `[0, 50]`.
///
/// # Examples
///
/// ```rust
/// use hatchstat::stats::{bubble_blessing, ModifierSource};
///
/// let max = bubble_blessing(50.0);
/// assert!((max.number("luck").unwrap() - 1.5).abs() < 1e-12);
/// assert!((max.number("baseHatchSpeed").unwrap() - 1.25).abs() < 1e-12);
/// assert_eq!(bubble_blessing(0.0).number("luck"), Some(0.0));
/// ```
pub fn bubble_blessing(level: f64) -> FieldBag {
    let level = clamp_or_min(level, 0.0, MAX_BLESSING_LEVEL);
    let unlocked = level >= 1.0;

    let luck = if unlocked {
        0.15 + (1.5 - 0.15) * (level - 1.0) / 49.0
    } else {
        0.0
    };
    let mut base_hatch_speed = if unlocked { 1.0 } else { 0.0 };
    if level >= 20.0 {
        base_hatch_speed += 0.05 + (0.25 - 0.05) * (level - 20.0) / 30.0;
    }

    FieldBag::new()
        .with("luck", luck)
        .with("baseHatchSpeed", base_hatch_speed)
}

/// Dreamer blessing: a secret-luck multiplier above level 10, nothing below.
pub fn dreamer_blessing(level: f64) -> FieldBag {
    let level = clamp_or_min(level, 0.0, MAX_BLESSING_LEVEL);
    if level > 10.0 {
        FieldBag::new().with(
            "secretLuckMultiplier",
            1.0 + (2.0 + (level - 10.0) * 1.2) / 100.0,
        )
    } else {
        FieldBag::new()
    }
}

/// Season pass perks: stars clamped to `[0, 1500]`, luck `stars / 600`,
/// hatch speed `stars / 7500`.
pub fn season_perks(stars: f64) -> FieldBag {
    let stars = clamp_or_min(stars, 0.0, MAX_SEASON_STARS);
    FieldBag::new()
        .with("luck", stars / 600.0)
        .with("hatchSpeed", stars / 7500.0)
}
