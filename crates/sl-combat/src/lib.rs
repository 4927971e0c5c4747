//! Dice-pool combat engine for Schattenlauf.
//!
//! Resolves opposed d6 attack tests (melee and ranged) between combatants
//! of two or more factions, schedules actions by initiative phase, tracks
//! physical and stun damage, and plays single matches or seeded batches
//! of them. All randomness comes through [`DiceSource`], so any match can
//! be replayed from its seed or scripted die by die.

pub mod attack;
pub mod character;
pub mod combatant;
pub mod dice;
pub mod error;
pub mod initiative;
pub mod map;
pub mod orchestrator;
pub mod status;
pub mod tables;

pub use attack::{ActionKind, AttackOutcome, PoolBreakdown, RoundResult, resolve_attack};
pub use character::{
    Attributes, Character, CharacterId, DamageType, FireMode, Metatype, Skills, Weapon,
    WeaponType,
};
pub use combatant::Combatant;
pub use dice::{DiceSource, PoolRoll, ScriptedDice, evaluate_pool, roll_pool};
pub use error::{CombatError, CombatResult};
pub use map::{CellType, DirectPath, GameMap, PathFinder, Position};
pub use orchestrator::{
    BatchConfig, BatchReport, MatchConfig, MatchOutcome, MatchResult, MatchSetup, MatchState,
    run_batch, run_match, start_match,
};
pub use status::{StatusChange, StatusKind, apply_damage, check_combat_end, wound_modifier};
