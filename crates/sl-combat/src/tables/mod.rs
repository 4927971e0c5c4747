//! Static rule data: range brackets, fire-mode and recoil modifiers, limits.
//!
//! These are pure lookups with no state. A lookup that the tables cannot
//! answer is a [`crate::CombatError::Configuration`], never a silent default.

pub mod modifiers;
pub mod range;

pub use modifiers::{
    Recoil, RUNNING_TARGET_PENALTY, fire_mode_defense_modifier, mental_limit, physical_limit,
    recoil,
};
pub use range::{RangeBracket, RangeTable, range_bracket, range_modifier, range_table};
