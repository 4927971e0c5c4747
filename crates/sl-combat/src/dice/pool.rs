//! Rolling a pool of dice.

use super::DiceSource;

/// Roll `n` independent d6. Returns an empty vector for `n == 0`.
pub fn roll_pool(n: u32, dice: &mut dyn DiceSource) -> Vec<u32> {
    (0..n).map(|_| dice.d6()).collect()
}
