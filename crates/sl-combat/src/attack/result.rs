//! The immutable record of one resolved action.

use serde::{Deserialize, Serialize};

use crate::character::{CharacterId, DamageType, FireMode};
use crate::dice::PoolRoll;
use crate::status::StatusChange;

/// What the actor spent the action on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Rolled an attack.
    Attack,
    /// Refilled an empty weapon.
    Reload,
}

/// How an attack ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// The attacker botched badly and took stun damage.
    CriticalGlitch {
        /// Stun boxes the attacker suffered.
        self_damage: u32,
    },
    /// The attack fizzled with no effect.
    Glitch,
    /// The defender matched or beat the attacker's hits.
    Miss,
    /// The hit landed but armour and body soaked all of it.
    Resisted,
    /// Damage got through.
    Hit {
        /// Boxes applied to the defender.
        damage: u32,
    },
}

impl std::fmt::Display for AttackOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriticalGlitch { self_damage } => {
                write!(f, "critical glitch ({self_damage} stun to self)")
            }
            Self::Glitch => write!(f, "glitch"),
            Self::Miss => write!(f, "miss"),
            Self::Resisted => write!(f, "resisted"),
            Self::Hit { damage } => write!(f, "hit for {damage}"),
        }
    }
}

/// One resolved action, as handed to presentation and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round in which the action happened (1-based).
    pub round: u32,
    /// Initiative score the actor acted on.
    pub initiative_phase: i32,
    /// Who acted.
    pub actor: CharacterId,
    /// Actor's name.
    pub actor_name: String,
    /// Who was targeted.
    pub target: Option<CharacterId>,
    /// What kind of action it was.
    pub action: ActionKind,
    /// Weapon used or reloaded.
    pub weapon: Option<String>,
    /// Fire mode, for ranged attacks.
    pub fire_mode: Option<FireMode>,
    /// Rounds of ammunition expended.
    pub rounds_fired: u32,
    /// Metres moved before acting.
    pub moved: u32,
    /// Attack roll.
    pub attack_roll: Option<PoolRoll>,
    /// Defence roll.
    pub defense_roll: Option<PoolRoll>,
    /// Damage-resistance roll.
    pub resistance_roll: Option<PoolRoll>,
    /// Attack hits after the limit.
    pub limited_hits: u32,
    /// Attacker hits minus defender hits.
    pub net_hits: i32,
    /// Attack result, for attacks.
    pub outcome: Option<AttackOutcome>,
    /// Boxes of damage dealt to the target.
    pub damage_dealt: u32,
    /// Track the damage went to.
    pub damage_type: Option<DamageType>,
    /// Human-readable account of every step.
    pub narration: Vec<String>,
    /// Knock-outs and deaths caused by this action.
    pub status_changes: Vec<StatusChange>,
}

impl RoundResult {
    /// A blank record for `actor`; the resolver fills in the rest.
    pub fn new(actor: CharacterId, actor_name: impl Into<String>, action: ActionKind) -> Self {
        Self {
            round: 0,
            initiative_phase: 0,
            actor,
            actor_name: actor_name.into(),
            target: None,
            action,
            weapon: None,
            fire_mode: None,
            rounds_fired: 0,
            moved: 0,
            attack_roll: None,
            defense_roll: None,
            resistance_roll: None,
            limited_hits: 0,
            net_hits: 0,
            outcome: None,
            damage_dealt: 0,
            damage_type: None,
            narration: Vec::new(),
            status_changes: Vec::new(),
        }
    }

    /// Append a narration line.
    pub fn narrate(&mut self, line: impl Into<String>) {
        self.narration.push(line.into());
    }

    /// True if any glitch happened on the attack roll.
    pub fn glitched(&self) -> bool {
        self.attack_roll.as_ref().is_some_and(|r| r.is_glitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display() {
        assert_eq!(
            AttackOutcome::CriticalGlitch { self_damage: 4 }.to_string(),
            "critical glitch (4 stun to self)"
        );
        assert_eq!(AttackOutcome::Hit { damage: 7 }.to_string(), "hit for 7");
        assert_eq!(AttackOutcome::Resisted.to_string(), "resisted");
    }

    #[test]
    fn blank_record() {
        let mut r = RoundResult::new(CharacterId(1), "Ace", ActionKind::Reload);
        r.narrate("Ace reloads.");
        assert_eq!(r.narration, vec!["Ace reloads.".to_string()]);
        assert!(!r.glitched());
        assert_eq!(r.outcome, None);
    }
}
