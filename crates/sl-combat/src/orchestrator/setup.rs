//! Roster, faction assignment, and situational modifiers for one match.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::character::{Character, CharacterId};
use crate::error::{CombatError, CombatResult};
use crate::map::GameMap;

/// One side of a fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRoster {
    /// Faction name, unique within a setup.
    pub name: String,
    /// Characters fighting for this faction, by roster id.
    pub members: Vec<CharacterId>,
}

/// Everything needed to start a match, as delivered by the roster provider.
///
/// Serialized form is the roster file read by the command-line front end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchSetup {
    /// Available characters.
    pub characters: Vec<Character>,
    /// Faction assignments, in placement order.
    pub factions: Vec<FactionRoster>,
    /// Signed situational modifier per character; absent means zero.
    #[serde(default)]
    pub modifiers: BTreeMap<CharacterId, i32>,
    /// Battlefield used for cover and movement, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<GameMap>,
    /// Characters moving at a run for the whole match.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub running: BTreeSet<CharacterId>,
    /// Characters sprinting for the whole match.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub sprinting: BTreeSet<CharacterId>,
}

impl MatchSetup {
    /// A setup over `characters` with no factions yet.
    pub fn new(characters: Vec<Character>) -> Self {
        Self {
            characters,
            ..Self::default()
        }
    }

    /// Add a faction made of the given character ids.
    pub fn with_faction(
        mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = u32>,
    ) -> Self {
        self.factions.push(FactionRoster {
            name: name.into(),
            members: members.into_iter().map(CharacterId).collect(),
        });
        self
    }

    /// Set a situational modifier for one character.
    pub fn with_modifier(mut self, id: u32, modifier: i32) -> Self {
        self.modifiers.insert(CharacterId(id), modifier);
        self
    }

    /// Fight on `map`.
    pub fn with_map(mut self, map: GameMap) -> Self {
        self.map = Some(map);
        self
    }

    /// Mark a character as running: doubled movement, harder to hit.
    pub fn with_running(mut self, id: u32) -> Self {
        self.running.insert(CharacterId(id));
        self
    }

    /// Mark a character as sprinting: running skill added to movement.
    pub fn with_sprinting(mut self, id: u32) -> Self {
        self.sprinting.insert(CharacterId(id));
        self
    }

    /// Look up a roster character.
    pub fn character(&self, id: CharacterId) -> CombatResult<&Character> {
        self.characters
            .iter()
            .find(|c| c.id == id)
            .ok_or(CombatError::UnknownCombatant(id))
    }

    /// Situational modifier for `id`.
    pub fn modifier(&self, id: CharacterId) -> i32 {
        self.modifiers.get(&id).copied().unwrap_or(0)
    }

    /// Check faction structure, membership, weapons, and the map.
    pub fn validate(&self) -> CombatResult<()> {
        let fielded = self.factions.iter().filter(|f| !f.members.is_empty()).count();
        if fielded < 2 {
            return Err(CombatError::invalid(format!(
                "a match needs at least two non-empty factions, got {fielded}"
            )));
        }

        let mut names = BTreeSet::new();
        let mut seen = BTreeSet::new();
        for faction in &self.factions {
            if !names.insert(faction.name.as_str()) {
                return Err(CombatError::invalid(format!(
                    "faction '{}' is listed twice",
                    faction.name
                )));
            }
            for &id in &faction.members {
                let character = self.character(id)?;
                if !seen.insert(id) {
                    return Err(CombatError::invalid(format!(
                        "{} ({id}) is assigned to more than one faction",
                        character.name
                    )));
                }
                for weapon in &character.weapons {
                    weapon.validate()?;
                }
            }
        }

        for &id in self.running.iter().chain(&self.sprinting) {
            if !seen.contains(&id) {
                return Err(CombatError::invalid(format!(
                    "character {id} moves at speed but fights for no faction"
                )));
            }
        }

        if let Some(map) = &self.map {
            map.validate()?;
        }
        Ok(())
    }
}
