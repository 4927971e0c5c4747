//! Six-sided dice, pools, and glitch evaluation.
//!
//! Every test in the ruleset rolls a pool of d6. A result of 5 or 6 is a
//! hit; a pool where more than half the dice show 1 has glitched. The
//! randomness itself comes from a [`DiceSource`], so a seeded RNG or a
//! scripted sequence can be swapped in without touching the rules.

pub mod pool;
pub mod roll;
pub mod scripted;

pub use pool::roll_pool;
pub use roll::{PoolRoll, evaluate_pool};
pub use scripted::ScriptedDice;

use rand::Rng;
use rand::rngs::StdRng;

/// Lowest face that counts as a hit.
pub const HIT_THRESHOLD: u32 = 5;

/// Number of faces on every die in the ruleset.
pub const SIDES: u32 = 6;

/// A source of uniform d6 results.
pub trait DiceSource {
    /// Roll one six-sided die, returning a value in `1..=6`.
    fn d6(&mut self) -> u32;
}

impl DiceSource for StdRng {
    fn d6(&mut self) -> u32 {
        self.random_range(1..=SIDES)
    }
}
