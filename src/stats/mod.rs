//! Stat composition.
//!
//! Modifier sources are folded into [`StatTotals`] in order and finalized
//! into a [`StatBundle`]. [`compose_stats`] applies the full set of game
//! sources on top of the caller's modifiers.

pub mod blessing;
pub mod bundle;
pub mod compose;
pub mod source;
pub mod totals;

pub use blessing::{bubble_blessing, dreamer_blessing, season_perks};
pub use bundle::StatBundle;
pub use compose::{compose_stats, daily_perk_for, StatInputs, StatKnobs, StatToggles};
pub use source::{FieldBag, ModifierSource, Repeated, REPEAT_FIELD};
pub use totals::{FinalShape, MultiplierMode, Stat, StatTotal, StatTotals};
