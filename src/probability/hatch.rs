//! Hatch timing.

use crate::config::HatchConfig;
use crate::stats::StatBundle;

/// Eggs opened per second at the given hatch speed.
pub fn eggs_per_second(hatch_speed: f64, eggs_per_hatch: f64, config: &HatchConfig) -> f64 {
    (1.0 / config.base_hatch_seconds) * hatch_speed * eggs_per_hatch
}

/// Expected seconds until a pet with `chance` per egg hatches.
///
/// Infinite when the chance, the hatch speed or the eggs per hatch is not
/// positive.
///
/// # Examples
///
/// ```rust
/// use hatchstat::config::HatchConfig;
/// use hatchstat::probability::hatch_time;
/// use hatchstat::stats::StatBundle;
///
/// let stats = StatBundle { hatch_speed: 1.0, eggs_per_hatch: 1.0, ..StatBundle::default() };
/// assert!((hatch_time(0.5, &stats, &HatchConfig::default()) - 9.0).abs() < 1e-9);
/// assert_eq!(hatch_time(0.0, &stats, &HatchConfig::default()), f64::INFINITY);
/// ```
pub fn hatch_time(chance: f64, stats: &StatBundle, config: &HatchConfig) -> f64 {
    if !(chance > 0.0 && stats.hatch_speed > 0.0 && stats.eggs_per_hatch > 0.0) {
        return f64::INFINITY;
    }
    (1.0 / chance) / eggs_per_second(stats.hatch_speed, stats.eggs_per_hatch, config)
}
