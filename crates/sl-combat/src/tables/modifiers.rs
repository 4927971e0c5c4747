//! Fire-mode, recoil, and limit formulas.

use crate::character::{Attributes, FireMode};

/// Attack-pool penalty when the defender is running.
pub const RUNNING_TARGET_PENALTY: i32 = 2;

/// Defence-pool modifier imposed by the attacker's fire mode.
pub fn fire_mode_defense_modifier(mode: FireMode) -> i32 {
    match mode {
        FireMode::SingleShot | FireMode::SemiAuto => 0,
        FireMode::BurstFire => -2,
        FireMode::FullAuto => -5,
    }
}

/// Recoil for one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recoil {
    /// Dice removed from the attack pool.
    pub penalty: u32,
    /// Amount the cumulative counter grows by.
    pub added: u32,
}

/// Recoil for firing `rounds` with `cumulative` recoil already built up.
///
/// The counter grows by every round beyond the first whether or not the
/// compensation absorbs it.
pub fn recoil(cumulative: u32, rounds: u32, compensation: u32) -> Recoil {
    let added = rounds.saturating_sub(1);
    Recoil {
        penalty: (cumulative + added).saturating_sub(compensation),
        added,
    }
}

fn limit(primary: u32, a: u32, b: u32) -> u32 {
    (2 * primary + a + b).div_ceil(3)
}

/// Cap on hits for physical tests: `ceil((2*STR + BOD + REA) / 3)`.
pub fn physical_limit(attrs: &Attributes) -> u32 {
    limit(attrs.strength, attrs.body, attrs.reaction)
}

/// Cap on hits for mental tests: `ceil((2*LOG + INT + WIL) / 3)`.
pub fn mental_limit(attrs: &Attributes) -> u32 {
    limit(attrs.logic, attrs.intuition, attrs.willpower)
}
