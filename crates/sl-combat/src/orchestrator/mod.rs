//! Match setup, the per-action state machine, and batch runs.
//!
//! The orchestrator is the only code that mutates combatants outside a
//! single attack. It owns the roster copy for one match, picks who acts,
//! whom they target, and with what, and moves melee fighters into reach.

pub mod batch;
pub mod config;
pub mod selection;
pub mod setup;
pub mod state;

pub use batch::{BatchReport, DamageStat, run_batch};
pub use config::{BatchConfig, MatchConfig};
pub use selection::{WeaponChoice, pick_target, select_best_weapon};
pub use setup::{FactionRoster, MatchSetup};
pub use state::{
    CombatantSummary, MatchOutcome, MatchResult, MatchState, Step, run_match, start_match,
};
