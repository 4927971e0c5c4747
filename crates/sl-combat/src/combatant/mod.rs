//! Mutable per-match projection of a character.
//!
//! A [`Combatant`] is created fresh for every match from a
//! [`Character`](crate::character::Character) and dropped with it. The
//! orchestrator is its only mutator; the attack engine touches damage and
//! recoil, the scheduler touches initiative.

use serde::{Deserialize, Serialize};

use crate::character::{Attributes, Character, CharacterId, Metatype, Skills, Weapon};
use crate::map::{GameMap, Position};

/// Cover a combatant has taken, recorded when it went to ground.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverState {
    /// Neighbouring cover cells at the time cover was taken.
    pub cells: Vec<Position>,
    /// Set by any movement after taking cover; the bonus is then void.
    pub moved: bool,
}

/// A character's state within one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    /// Roster identifier.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Ancestry.
    pub metatype: Metatype,
    /// Attribute scores.
    pub attributes: Attributes,
    /// Skill ratings.
    pub skills: Skills,
    /// Owned weapons in preference order.
    pub weapons: Vec<Weapon>,
    /// d6 rolled for initiative.
    pub initiative_dice: u32,

    /// Faction this combatant fights for.
    pub faction: String,
    /// Grid position.
    pub position: Position,
    /// Initiative rolled at the start of the match.
    pub original_initiative: i32,
    /// Initiative left in the current round. Changed only by the scheduler.
    pub current_initiative: i32,
    /// Recoil built up over the match.
    pub recoil: u32,
    /// External situational modifier, fixed for the match.
    pub situational_modifier: i32,
    /// Boxes of physical damage taken.
    pub physical_damage: u32,
    /// Boxes of stun damage taken.
    pub stun_damage: u32,
    /// Still on their feet.
    pub is_conscious: bool,
    /// Not dead.
    pub is_alive: bool,
    /// Damage this combatant has inflicted on others.
    pub damage_dealt: u32,
    /// Metres of movement left this round.
    pub movement_remaining: u32,
    /// Cover taken, if any.
    pub cover: Option<CoverState>,
    /// Moving at a run; harder to hit, moves twice as far.
    pub is_running: bool,
    /// Sprinting; adds running skill to the movement allowance.
    pub is_sprinting: bool,
}

impl Combatant {
    /// Project a character into a match.
    pub fn from_character(
        character: &Character,
        faction: impl Into<String>,
        situational_modifier: i32,
        position: Position,
    ) -> Self {
        let mut combatant = Self {
            id: character.id,
            name: character.name.clone(),
            metatype: character.metatype,
            attributes: character.attributes,
            skills: character.skills,
            weapons: character.weapons.clone(),
            initiative_dice: character.initiative_dice,
            faction: faction.into(),
            position,
            original_initiative: 0,
            current_initiative: 0,
            recoil: 0,
            situational_modifier,
            physical_damage: 0,
            stun_damage: 0,
            is_conscious: true,
            is_alive: true,
            damage_dealt: 0,
            movement_remaining: 0,
            cover: None,
            is_running: false,
            is_sprinting: false,
        };
        combatant.movement_remaining = combatant.movement_allowance();
        combatant
    }

    /// Metres this combatant may move per round.
    pub fn movement_allowance(&self) -> u32 {
        let base = self.attributes.agility.saturating_mul(2);
        let base = if self.is_running { base.saturating_mul(2) } else { base };
        if self.is_sprinting {
            base.saturating_add(self.skills.running)
        } else {
            base
        }
    }

    /// Can act: alive and conscious.
    pub fn is_standing(&self) -> bool {
        self.is_alive && self.is_conscious
    }

    /// Longest melee reach this combatant can bring to bear, metatype included.
    pub fn melee_reach(&self) -> u32 {
        let weapon_reach = self
            .weapons
            .iter()
            .filter(|w| w.is_melee())
            .map(Weapon::reach)
            .max()
            .unwrap_or(0);
        weapon_reach + self.metatype.reach_bonus()
    }

    /// Go to ground, recording the adjacent cover cells on `map`.
    pub fn take_cover(&mut self, map: &GameMap) {
        self.cover = Some(CoverState {
            cells: map.adjacent_cover(self.position),
            moved: false,
        });
    }

    /// Cover cells that still protect this combatant.
    pub fn active_cover(&self) -> Option<&[Position]> {
        self.cover
            .as_ref()
            .filter(|c| !c.moved)
            .map(|c| c.cells.as_slice())
    }

    /// Move to `to`, spending `cost` metres and voiding any cover.
    pub fn move_to(&mut self, to: Position, cost: u32) {
        if to == self.position {
            return;
        }
        self.position = to;
        self.movement_remaining = self.movement_remaining.saturating_sub(cost);
        if let Some(cover) = &mut self.cover {
            cover.moved = true;
        }
    }
}
