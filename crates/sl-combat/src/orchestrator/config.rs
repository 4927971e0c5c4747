//! Match and batch configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a single match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// RNG seed for deterministic matches.
    pub seed: u64,
    /// Metres between the two starting positions.
    pub initial_distance: u32,
    /// Rounds played before the match is called on headcount.
    pub round_cap: u32,
    /// Distance at which a melee weapon is preferred and can strike.
    pub melee_range: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_distance: 10,
            round_cap: 20,
            melee_range: 2,
        }
    }
}

impl MatchConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the starting distance between factions.
    pub fn with_initial_distance(mut self, distance: u32) -> Self {
        self.initial_distance = distance;
        self
    }

    /// Set the round cap.
    pub fn with_round_cap(mut self, cap: u32) -> Self {
        self.round_cap = cap;
        self
    }

    /// Set the melee range.
    pub fn with_melee_range(mut self, range: u32) -> Self {
        self.melee_range = range;
        self
    }
}

/// Configuration for a batch of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of matches to run.
    pub matches: usize,
    /// Base seed; match `i` uses `seed + i`.
    pub seed: u64,
    /// Spread matches over the rayon thread pool.
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            matches: 100,
            seed: 42,
            parallel: true,
        }
    }
}

impl BatchConfig {
    /// Set the number of matches.
    pub fn with_matches(mut self, matches: usize) -> Self {
        self.matches = matches;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run in parallel or on the calling thread.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Seed for the `index`-th match of the batch.
    pub fn match_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_config_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.initial_distance, 10);
        assert_eq!(config.round_cap, 20);
        assert_eq!(config.melee_range, 2);
    }

    #[test]
    fn match_config_builder_chain() {
        let config = MatchConfig::default()
            .with_seed(7)
            .with_initial_distance(30)
            .with_round_cap(5)
            .with_melee_range(1);
        assert_eq!(config.seed, 7);
        assert_eq!(config.initial_distance, 30);
        assert_eq!(config.round_cap, 5);
        assert_eq!(config.melee_range, 1);
    }

    #[test]
    fn batch_config_defaults_and_builders() {
        let config = BatchConfig::default();
        assert_eq!(config.matches, 100);
        assert!(config.parallel);

        let config = config.with_matches(3).with_seed(10).with_parallel(false);
        assert_eq!(config.matches, 3);
        assert!(!config.parallel);
        assert_eq!(config.match_seed(2), 12);
    }

    #[test]
    fn match_seed_wraps() {
        let config = BatchConfig::default().with_seed(u64::MAX);
        assert_eq!(config.match_seed(1), 0);
    }
}
