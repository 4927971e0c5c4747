//! Character records as supplied by the roster provider.
//!
//! A [`Character`] is the persistent description of a runner: ancestry,
//! attributes, skills, and gear. It never changes during a match; the
//! mutable per-match projection is [`crate::combatant::Combatant`].

pub mod weapon;

pub use weapon::{DamageType, FireMode, Magazine, Weapon, WeaponCategory, WeaponClass, WeaponType};

use serde::{Deserialize, Serialize};

/// Stable identifier of a character within a roster.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ancestry of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metatype {
    /// Baseline human.
    #[default]
    Human,
    /// Elf.
    Elf,
    /// Dwarf.
    Dwarf,
    /// Ork.
    Ork,
    /// Troll.
    Troll,
}

impl Metatype {
    /// Natural reach added to every melee attack and melee defence.
    pub fn reach_bonus(self) -> u32 {
        match self {
            Self::Troll => 1,
            Self::Human | Self::Elf | Self::Dwarf | Self::Ork => 0,
        }
    }
}

impl std::fmt::Display for Metatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Elf => write!(f, "elf"),
            Self::Dwarf => write!(f, "dwarf"),
            Self::Ork => write!(f, "ork"),
            Self::Troll => write!(f, "troll"),
        }
    }
}

/// The eight attribute scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Toughness; drives damage resistance and the physical monitor.
    pub body: u32,
    /// Coordination; base of every attack pool.
    pub agility: u32,
    /// Reflexes; initiative and defence.
    pub reaction: u32,
    /// Raw power; physical limit and thrown-weapon range.
    pub strength: u32,
    /// Grit; drives the stun monitor.
    pub willpower: u32,
    /// Reasoning.
    pub logic: u32,
    /// Awareness; initiative and defence.
    pub intuition: u32,
    /// Presence.
    pub charisma: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            body: 3,
            agility: 3,
            reaction: 3,
            strength: 3,
            willpower: 3,
            logic: 3,
            intuition: 3,
            charisma: 3,
        }
    }
}

/// Combat-relevant skill ratings. Missing skills count as untrained (0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    /// Ranged weapons.
    pub firearms: u32,
    /// Melee weapons and unarmed.
    pub close_combat: u32,
    /// Sprinting distance.
    pub running: u32,
    /// Worn armour rating used against damage.
    pub armor: u32,
}

fn default_initiative_dice() -> u32 {
    1
}

/// A character as delivered by the roster provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Roster identifier.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Ancestry.
    #[serde(default)]
    pub metatype: Metatype,
    /// Attribute scores.
    #[serde(default)]
    pub attributes: Attributes,
    /// Skill ratings.
    #[serde(default)]
    pub skills: Skills,
    /// Owned weapons in preference order.
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    /// Number of d6 added to the initiative score.
    #[serde(default = "default_initiative_dice")]
    pub initiative_dice: u32,
}

impl Character {
    /// Create a character with average attributes and no gear.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: CharacterId(id),
            name: name.into(),
            metatype: Metatype::default(),
            attributes: Attributes::default(),
            skills: Skills::default(),
            weapons: Vec::new(),
            initiative_dice: default_initiative_dice(),
        }
    }

    /// Set the metatype.
    pub fn with_metatype(mut self, metatype: Metatype) -> Self {
        self.metatype = metatype;
        self
    }

    /// Replace the attribute block.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Replace the skill block.
    pub fn with_skills(mut self, skills: Skills) -> Self {
        self.skills = skills;
        self
    }

    /// Add a weapon at the end of the preference list.
    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    /// Set the number of initiative dice.
    pub fn with_initiative_dice(mut self, dice: u32) -> Self {
        self.initiative_dice = dice;
        self
    }
}
