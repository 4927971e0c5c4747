//! Condition monitors, wound modifiers, and combat-end detection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::character::{CharacterId, DamageType};
use crate::combatant::Combatant;

/// Boxes on the physical monitor: `8 + ceil(BOD / 2)`.
pub fn max_physical(c: &Combatant) -> u32 {
    8 + c.attributes.body.div_ceil(2)
}

/// Boxes on the stun monitor: `8 + ceil(WIL / 2)`.
pub fn max_stun(c: &Combatant) -> u32 {
    8 + c.attributes.willpower.div_ceil(2)
}

/// Dice lost to injuries: one per three boxes on each monitor.
pub fn wound_modifier(c: &Combatant) -> u32 {
    c.physical_damage / 3 + c.stun_damage / 3
}

/// What happened to a combatant as a result of damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Dropped unconscious.
    KnockedOut,
    /// Died.
    Killed,
}

/// A status transition reported with a round result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Who it happened to.
    pub combatant: CharacterId,
    /// Their name, for narration.
    pub name: String,
    /// The transition.
    pub kind: StatusKind,
}

impl std::fmt::Display for StatusChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            StatusKind::KnockedOut => write!(f, "{} is knocked unconscious", self.name),
            StatusKind::Killed => write!(f, "{} is killed", self.name),
        }
    }
}

/// Apply `amount` boxes of damage and reclassify consciousness and life.
///
/// Stun beyond the stun monitor spills into physical damage. Returns the
/// transitions this damage caused.
pub fn apply_damage(c: &mut Combatant, amount: u32, damage_type: DamageType) -> Vec<StatusChange> {
    let was_conscious = c.is_conscious;
    let was_alive = c.is_alive;

    match damage_type {
        DamageType::Physical => c.physical_damage += amount,
        DamageType::Stun => {
            c.stun_damage += amount;
            let max = max_stun(c);
            if c.stun_damage > max {
                c.physical_damage += c.stun_damage - max;
                c.stun_damage = max;
            }
        }
    }

    if c.physical_damage > max_physical(c) {
        c.is_alive = false;
        c.is_conscious = false;
    } else if c.is_alive {
        c.is_conscious = c.stun_damage < max_stun(c);
    }

    let mut changes = Vec::new();
    if was_alive && !c.is_alive {
        changes.push(StatusChange {
            combatant: c.id,
            name: c.name.clone(),
            kind: StatusKind::Killed,
        });
    } else if was_conscious && !c.is_conscious {
        changes.push(StatusChange {
            combatant: c.id,
            name: c.name.clone(),
            kind: StatusKind::KnockedOut,
        });
    }
    changes
}

/// Factions with at least one combatant still standing.
pub fn standing_factions(combatants: &[Combatant]) -> BTreeSet<&str> {
    combatants
        .iter()
        .filter(|c| c.is_standing())
        .map(|c| c.faction.as_str())
        .collect()
}

/// True once at most one faction still has anyone standing.
pub fn check_combat_end(combatants: &[Combatant]) -> bool {
    standing_factions(combatants).len() <= 1
}

/// Monitor summary such as `P 4/10 S 2/10`.
pub fn condition_label(c: &Combatant) -> String {
    format!(
        "P {}/{} S {}/{}",
        c.physical_damage,
        max_physical(c),
        c.stun_damage,
        max_stun(c)
    )
}
