//! Many independent matches and their aggregate statistics.
//!
//! Every match gets its own roster copy and its own RNG seeded from
//! [`BatchConfig::match_seed`], so a batch gives the same report whether it
//! runs on the rayon pool or on the calling thread.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::character::CharacterId;
use crate::error::CombatResult;

use super::config::{BatchConfig, MatchConfig};
use super::setup::MatchSetup;
use super::state::{MatchResult, run_match};

/// Mean damage a character dealt per completed match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageStat {
    /// Roster id.
    pub id: CharacterId,
    /// Name.
    pub name: String,
    /// Faction.
    pub faction: String,
    /// Mean boxes dealt per match.
    pub mean_damage_dealt: f64,
}

/// Aggregate results of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Matches attempted.
    pub matches: usize,
    /// Wins per faction; every faction in the setup is listed.
    pub wins: BTreeMap<String, usize>,
    /// Drawn matches.
    pub draws: usize,
    /// Matches skipped because of a recoverable error.
    pub failed: usize,
    /// Matches called at the round cap.
    pub capped: usize,
    /// Mean rounds over completed matches.
    pub mean_rounds: f64,
    /// Per-character damage, in roster order.
    pub damage: Vec<DamageStat>,
    /// Completed matches in seed order.
    pub results: Vec<MatchResult>,
}

impl BatchReport {
    /// Matches that ran to completion.
    pub fn completed(&self) -> usize {
        self.matches - self.failed
    }

    /// Share of completed matches `faction` won, in `0.0..=1.0`.
    pub fn win_rate(&self, faction: &str) -> f64 {
        let wins = self.wins.get(faction).copied().unwrap_or(0);
        ratio(wins as f64, self.completed())
    }

    /// Share of completed matches that were drawn.
    pub fn draw_rate(&self) -> f64 {
        ratio(self.draws as f64, self.completed())
    }
}

fn ratio(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Run `batch.matches` matches of `setup`.
///
/// A match that fails with a recoverable error is counted in
/// [`BatchReport::failed`] and skipped. Any other error aborts the batch.
pub fn run_batch(
    setup: &MatchSetup,
    match_config: &MatchConfig,
    batch: &BatchConfig,
) -> CombatResult<BatchReport> {
    let play = |index: usize| {
        let config = match_config.clone().with_seed(batch.match_seed(index));
        run_match(setup, &config)
    };
    let outcomes: Vec<CombatResult<MatchResult>> = if batch.parallel {
        (0..batch.matches).into_par_iter().map(play).collect()
    } else {
        (0..batch.matches).map(play).collect()
    };

    let mut wins: BTreeMap<String, usize> = setup
        .factions
        .iter()
        .map(|f| (f.name.clone(), 0))
        .collect();
    let mut draws = 0;
    let mut failed = 0;
    let mut results = Vec::with_capacity(outcomes.len());

    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(result) => {
                match result.outcome.winner() {
                    Some(faction) => *wins.entry(faction.to_string()).or_default() += 1,
                    None => draws += 1,
                }
                results.push(result);
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!("match {} (seed {}) skipped: {}", index, batch.match_seed(index), e);
                failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let completed = results.len();
    let capped = results.iter().filter(|r| r.hit_round_cap).count();
    let mean_rounds = ratio(
        results.iter().map(|r| r.rounds as f64).sum(),
        completed,
    );

    let mut dealt: BTreeMap<CharacterId, u64> = BTreeMap::new();
    for summary in results.iter().flat_map(|r| &r.summaries) {
        *dealt.entry(summary.id).or_default() += u64::from(summary.damage_dealt);
    }
    let damage = setup
        .factions
        .iter()
        .flat_map(|f| f.members.iter().map(move |&id| (f, id)))
        .filter_map(|(faction, id)| {
            let character = setup.character(id).ok()?;
            Some(DamageStat {
                id,
                name: character.name.clone(),
                faction: faction.name.clone(),
                mean_damage_dealt: ratio(
                    dealt.get(&id).copied().unwrap_or(0) as f64,
                    completed,
                ),
            })
        })
        .collect();

    tracing::info!(
        "batch of {} matches: {:?} wins, {} draws, {} failed",
        batch.matches,
        wins,
        draws,
        failed
    );

    Ok(BatchReport {
        matches: batch.matches,
        wins,
        draws,
        failed,
        capped,
        mean_rounds,
        damage,
        results,
    })
}
