//! Evaluated dice pools: hits, ones, and glitches.

use serde::{Deserialize, Serialize};

use super::{DiceSource, HIT_THRESHOLD, roll_pool};

/// A rolled pool together with its evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRoll {
    /// Individual die faces in roll order.
    pub values: Vec<u32>,
    /// Dice showing 5 or 6.
    pub hits: u32,
    /// Dice showing 1.
    pub ones: u32,
    /// More than half of the dice showed 1.
    pub is_glitch: bool,
    /// A glitch with no hits at all.
    pub is_critical_glitch: bool,
}

impl PoolRoll {
    /// Roll `n` dice and evaluate them.
    pub fn roll(n: u32, dice: &mut dyn DiceSource) -> Self {
        evaluate_pool(&roll_pool(n, dice))
    }

    /// Number of dice in the pool.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Hits capped at `limit`.
    pub fn limited_hits(&self, limit: u32) -> u32 {
        self.hits.min(limit)
    }
}

/// Evaluate a sequence of die faces.
pub fn evaluate_pool(rolls: &[u32]) -> PoolRoll {
    let hits = rolls.iter().filter(|&&v| v >= HIT_THRESHOLD).count() as u32;
    let ones = rolls.iter().filter(|&&v| v == 1).count() as u32;
    let n = rolls.len() as u32;
    let is_glitch = n > 0 && ones * 2 > n;
    PoolRoll {
        values: rolls.to_vec(),
        hits,
        ones,
        is_glitch,
        is_critical_glitch: is_glitch && hits == 0,
    }
}

impl std::fmt::Display for PoolRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.values.iter().map(u32::to_string).collect();
        write!(f, "[{}] = {} hits", values.join(", "), self.hits)?;
        if self.is_critical_glitch {
            write!(f, " (critical glitch)")
        } else if self.is_glitch {
            write!(f, " (glitch)")
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use proptest::prelude::*;

    #[test]
    fn mixed_pool_without_glitch() {
        let r = evaluate_pool(&[1, 2, 5, 5, 6, 1]);
        assert_eq!(r.hits, 3);
        assert_eq!(r.ones, 2);
        assert!(!r.is_glitch);
        assert!(!r.is_critical_glitch);
    }

    #[test]
    fn critical_glitch() {
        let r = evaluate_pool(&[1, 1, 1, 2]);
        assert_eq!(r.ones, 3);
        assert_eq!(r.hits, 0);
        assert!(r.is_glitch);
        assert!(r.is_critical_glitch);
    }

    #[test]
    fn glitch_with_hits_is_not_critical() {
        let r = evaluate_pool(&[1, 1, 6]);
        assert!(r.is_glitch);
        assert!(!r.is_critical_glitch);
    }

    #[test]
    fn exactly_half_ones_is_not_a_glitch() {
        let r = evaluate_pool(&[1, 1, 3, 4]);
        assert!(!r.is_glitch);
    }

    #[test]
    fn empty_pool_never_glitches() {
        let r = evaluate_pool(&[]);
        assert_eq!(r.hits, 0);
        assert!(!r.is_glitch);
        assert!(!r.is_critical_glitch);
    }

    #[test]
    fn limited_hits_caps() {
        let r = evaluate_pool(&[5, 6, 6, 5]);
        assert_eq!(r.limited_hits(3), 3);
        assert_eq!(r.limited_hits(9), 4);
    }

    #[test]
    fn roll_uses_source() {
        let mut dice = ScriptedDice::new([6, 5, 2]);
        let r = PoolRoll::roll(3, &mut dice);
        assert_eq!(r.values, vec![6, 5, 2]);
        assert_eq!(r.hits, 2);
        assert_eq!(r.size(), 3);
    }

    #[test]
    fn display() {
        assert_eq!(evaluate_pool(&[3, 5]).to_string(), "[3, 5] = 1 hits");
        assert_eq!(
            evaluate_pool(&[1, 1, 2]).to_string(),
            "[1, 1, 2] = 0 hits (critical glitch)"
        );
    }

    proptest! {
        #[test]
        fn counts_consistent_with_length(rolls in proptest::collection::vec(1u32..=6, 0..40)) {
            let r = evaluate_pool(&rolls);
            let middle = rolls.iter().filter(|&&v| (2..5).contains(&v)).count() as u32;
            prop_assert_eq!(r.hits + r.ones + middle, rolls.len() as u32);
            prop_assert!(!r.is_critical_glitch || r.is_glitch);
            prop_assert_eq!(r.is_glitch, !rolls.is_empty() && r.ones * 2 > rolls.len() as u32);
        }
    }
}
