//! The match state machine.
//!
//! [`start_match`] builds a [`MatchState`]; each call to
//! [`MatchState::resolve_next_action`] lets exactly one combatant act and
//! reports whether the match is over. The caller decides when to step, so
//! the same machine drives a turn-by-turn display and a batch loop.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::attack::{ActionKind, RoundResult, resolve_attack};
use crate::character::CharacterId;
use crate::combatant::Combatant;
use crate::dice::DiceSource;
use crate::error::{CombatError, CombatResult};
use crate::initiative::{
    end_action, next_actor, reset_round, roll_initiative, round_exhausted, sort_by_initiative,
};
use crate::map::{DirectPath, GameMap, PathFinder, Position};
use crate::status::{check_combat_end, condition_label, standing_factions};

use super::config::MatchConfig;
use super::selection::{WeaponChoice, pick_target, select_best_weapon};
use super::setup::MatchSetup;

/// How a match ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// One faction is left standing, or led on headcount at the round cap.
    Victory {
        /// Winning faction.
        faction: String,
    },
    /// Nobody left standing, or level on headcount at the round cap.
    Draw,
}

impl MatchOutcome {
    /// The winning faction, if any.
    pub fn winner(&self) -> Option<&str> {
        match self {
            Self::Victory { faction } => Some(faction),
            Self::Draw => None,
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Victory { faction } => write!(f, "{faction} wins"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Final condition of one combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSummary {
    /// Roster id.
    pub id: CharacterId,
    /// Name.
    pub name: String,
    /// Faction.
    pub faction: String,
    /// Physical boxes taken.
    pub physical_damage: u32,
    /// Stun boxes taken.
    pub stun_damage: u32,
    /// Damage inflicted on others.
    pub damage_dealt: u32,
    /// Survived.
    pub is_alive: bool,
    /// Still standing.
    pub is_conscious: bool,
    /// Monitor summary, e.g. `P 4/10 S 0/10`.
    pub condition: String,
}

impl From<&Combatant> for CombatantSummary {
    fn from(c: &Combatant) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            faction: c.faction.clone(),
            physical_damage: c.physical_damage,
            stun_damage: c.stun_damage,
            damage_dealt: c.damage_dealt,
            is_alive: c.is_alive,
            is_conscious: c.is_conscious,
            condition: condition_label(c),
        }
    }
}

/// The record of a finished match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Winner or draw.
    pub outcome: MatchOutcome,
    /// Rounds played.
    pub rounds: u32,
    /// Every action in order.
    pub actions: Vec<RoundResult>,
    /// Final state of every combatant, in initiative order.
    pub summaries: Vec<CombatantSummary>,
    /// True if the match was called at the round cap.
    pub hit_round_cap: bool,
}

/// What one step of the state machine produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// The action just resolved.
    pub result: RoundResult,
    /// True if this action ended the match.
    pub ended: bool,
}

/// A match in progress.
pub struct MatchState {
    combatants: Vec<Combatant>,
    round: u32,
    config: MatchConfig,
    map: Option<GameMap>,
    pathfinder: Arc<dyn PathFinder>,
    history: Vec<RoundResult>,
    outcome: Option<MatchOutcome>,
    hit_round_cap: bool,
}

impl std::fmt::Debug for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchState")
            .field("round", &self.round)
            .field("combatants", &self.combatants.len())
            .field("actions", &self.history.len())
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Build combatants, place them, roll initiative, and fix the order.
///
/// The first faction starts at the origin, every other faction
/// `initial_distance` metres east of it.
pub fn start_match(
    setup: &MatchSetup,
    config: &MatchConfig,
    dice: &mut dyn DiceSource,
) -> CombatResult<MatchState> {
    setup.validate()?;

    let mut combatants = Vec::new();
    for (index, faction) in setup.factions.iter().enumerate() {
        let position = if index == 0 {
            Position::new(0, 0)
        } else {
            Position::new(config.initial_distance as i32, 0)
        };
        for &id in &faction.members {
            let character = setup.character(id)?;
            let mut combatant = Combatant::from_character(
                character,
                faction.name.as_str(),
                setup.modifier(id),
                position,
            );
            combatant.is_running = setup.running.contains(&id);
            combatant.is_sprinting = setup.sprinting.contains(&id);
            combatant.movement_remaining = combatant.movement_allowance();
            combatants.push(combatant);
        }
    }

    // Everyone starts behind whatever cover is next to them.
    if let Some(map) = &setup.map {
        for c in &mut combatants {
            c.take_cover(map);
        }
    }

    for c in &mut combatants {
        let score = roll_initiative(c, dice);
        tracing::debug!("{} rolls initiative {}", c.name, score);
    }
    sort_by_initiative(&mut combatants);

    Ok(MatchState {
        combatants,
        round: 1,
        config: config.clone(),
        map: setup.map.clone(),
        pathfinder: Arc::new(DirectPath),
        history: Vec::new(),
        outcome: None,
        hit_round_cap: false,
    })
}

/// Play a whole match with an RNG seeded from `config.seed`.
pub fn run_match(setup: &MatchSetup, config: &MatchConfig) -> CombatResult<MatchResult> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut state = start_match(setup, config, &mut rng)?;
    state.run(&mut rng)?;
    Ok(state.into_result())
}

impl MatchState {
    /// Replace the default straight-line path finder.
    pub fn with_pathfinder(mut self, pathfinder: Arc<dyn PathFinder>) -> Self {
        self.pathfinder = pathfinder;
        self
    }

    /// Combatants in initiative order.
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    /// Look up a combatant by roster id.
    pub fn combatant(&self, id: CharacterId) -> CombatResult<&Combatant> {
        self.combatants
            .iter()
            .find(|c| c.id == id)
            .ok_or(CombatError::UnknownCombatant(id))
    }

    /// Mutable lookup by roster id, for callers that adjust state between steps.
    pub fn combatant_mut(&mut self, id: CharacterId) -> CombatResult<&mut Combatant> {
        self.combatants
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CombatError::UnknownCombatant(id))
    }

    /// Current round, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Actions resolved so far.
    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    /// The battlefield, if any.
    pub fn map(&self) -> Option<&GameMap> {
        self.map.as_ref()
    }

    /// The outcome once the match has ended.
    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    /// True once the match has ended.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Let the next combatant act.
    ///
    /// On error every combatant is restored to its state before the call.
    pub fn resolve_next_action(&mut self, dice: &mut dyn DiceSource) -> CombatResult<Step> {
        if self.is_over() {
            return Err(CombatError::MatchOver);
        }

        let snapshot = self.combatants.clone();
        let mut result = match self.act(dice) {
            Ok(result) => result,
            Err(e) => {
                self.combatants = snapshot;
                return Err(e);
            }
        };
        result.round = self.round;

        if check_combat_end(&self.combatants) {
            let outcome = match standing_factions(&self.combatants).into_iter().next() {
                Some(faction) => MatchOutcome::Victory {
                    faction: faction.to_string(),
                },
                None => MatchOutcome::Draw,
            };
            self.finish(outcome);
        } else if round_exhausted(&self.combatants) {
            self.new_round();
        }

        self.history.push(result.clone());
        Ok(Step {
            result,
            ended: self.is_over(),
        })
    }

    /// Step until the match ends.
    pub fn run(&mut self, dice: &mut dyn DiceSource) -> CombatResult<()> {
        while !self.is_over() {
            self.resolve_next_action(dice)?;
        }
        Ok(())
    }

    /// Consume the state into its result. An unfinished match reports a draw.
    pub fn into_result(self) -> MatchResult {
        MatchResult {
            outcome: self.outcome.unwrap_or(MatchOutcome::Draw),
            rounds: self.round.min(self.config.round_cap.max(1)),
            summaries: self.combatants.iter().map(CombatantSummary::from).collect(),
            actions: self.history,
            hit_round_cap: self.hit_round_cap,
        }
    }

    fn act(&mut self, dice: &mut dyn DiceSource) -> CombatResult<RoundResult> {
        let actor = match next_actor(&self.combatants) {
            Some(i) => i,
            None => {
                reset_round(&mut self.combatants);
                next_actor(&self.combatants)
                    .ok_or_else(|| CombatError::invalid("no combatant has initiative to act"))?
            }
        };
        let target = pick_target(&self.combatants, actor).ok_or_else(|| {
            CombatError::invalid(format!("{} has nobody to fight", self.combatants[actor].name))
        })?;

        let phase = self.combatants[actor].current_initiative;
        let distance = self.distance(actor, target);
        let choice = select_best_weapon(&self.combatants[actor], distance, self.config.melee_range)?;

        let mut result = match choice {
            WeaponChoice::Reload(index) => self.reload(actor, index),
            WeaponChoice::Use(index) => {
                let weapon = self.combatants[actor].weapons[index].clone();
                let mut moved = 0;
                if weapon.is_melee() && distance > self.config.melee_range {
                    moved = self.advance(actor, target);
                }
                let distance = self.distance(actor, target);

                let (attacker, defender) = pair_mut(&mut self.combatants, actor, target);
                let mut result = resolve_attack(
                    attacker,
                    defender,
                    &weapon,
                    None,
                    distance,
                    self.map.as_ref(),
                    dice,
                )?;
                attacker.weapons[index].expend(result.rounds_fired);
                result.moved = moved;
                if moved > 0 {
                    let a = &self.combatants[actor];
                    result.narration.insert(
                        0,
                        format!("{} moves {}m to {}.", a.name, moved, a.position),
                    );
                }
                result
            }
        };

        result.initiative_phase = phase;
        end_action(&mut self.combatants[actor]);
        Ok(result)
    }

    fn reload(&mut self, actor: usize, index: usize) -> RoundResult {
        let a = &mut self.combatants[actor];
        let weapon = &mut a.weapons[index];
        weapon.reload();
        let mut result = RoundResult::new(a.id, &a.name, ActionKind::Reload);
        result.weapon = Some(weapon.name.clone());
        result.narrate(format!("{} reloads the {}.", a.name, weapon.name));
        result
    }

    /// Step toward the target until in melee range or out of movement.
    /// Returns metres moved.
    fn advance(&mut self, actor: usize, target: usize) -> u32 {
        let open = GameMap::new(0, 0);
        let map = self.map.as_ref().unwrap_or(&open);
        let goal = self.combatants[target].position;
        let start = self.combatants[actor].position;
        let blocked: Vec<Position> = self
            .combatants
            .iter()
            .enumerate()
            .filter(|&(i, c)| i != actor && c.is_alive)
            .map(|(_, c)| c.position)
            .collect();

        let mut here = start;
        let mut budget = self.combatants[actor].movement_remaining;
        while budget > 0 && here.distance_to(goal) > self.config.melee_range {
            // Any neighbour that closes the gap will do; prefer the straightest.
            // A fighter standing on the map never steps off it.
            let on_map = map.contains(here);
            let Some(next) = here
                .neighbors()
                .filter(|&p| {
                    p.distance_to(goal) < here.distance_to(goal)
                        && (!on_map || map.contains(p))
                        && map.is_passable(p)
                        && !blocked.contains(&p)
                })
                .min_by_key(|&p| {
                    let dx = i64::from(goal.x) - i64::from(p.x);
                    let dy = i64::from(goal.y) - i64::from(p.y);
                    dx * dx + dy * dy
                })
            else {
                break;
            };
            here = next;
            budget -= 1;
        }

        if here == start {
            return 0;
        }
        match self.pathfinder.path_length(map, start, here, &blocked) {
            Some(cost) if cost <= self.combatants[actor].movement_remaining => {
                self.combatants[actor].move_to(here, cost);
                cost
            }
            _ => 0,
        }
    }

    fn distance(&self, a: usize, b: usize) -> u32 {
        self.combatants[a]
            .position
            .distance_to(self.combatants[b].position)
    }

    fn new_round(&mut self) {
        reset_round(&mut self.combatants);
        self.round += 1;
        tracing::debug!("round {} begins", self.round);
        if self.round > self.config.round_cap {
            self.hit_round_cap = true;
            let outcome = self.headcount_outcome();
            tracing::warn!(
                "match hit the round cap of {}; {}",
                self.config.round_cap,
                outcome
            );
            self.finish(outcome);
        }
    }

    /// Faction with strictly the most members standing, else a draw.
    fn headcount_outcome(&self) -> MatchOutcome {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for c in self.combatants.iter().filter(|c| c.is_standing()) {
            *counts.entry(c.faction.as_str()).or_default() += 1;
        }
        let best = counts.values().copied().max().unwrap_or(0);
        let mut leaders = counts.iter().filter(|&(_, &n)| n == best);
        match (leaders.next(), leaders.next()) {
            (Some((faction, _)), None) => MatchOutcome::Victory {
                faction: faction.to_string(),
            },
            _ => MatchOutcome::Draw,
        }
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        tracing::info!(
            "match over after {} rounds and {} actions: {}",
            self.round.min(self.config.round_cap.max(1)),
            self.history.len() + 1,
            outcome
        );
        self.outcome = Some(outcome);
    }
}

/// Two distinct mutable elements of a slice.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::AttackOutcome;
    use crate::character::{Attributes, Character, FireMode, Skills, Weapon, WeaponType};
    use crate::dice::ScriptedDice;
    use crate::map::CellType;

    fn brawler(id: u32, name: &str, reaction: u32) -> Character {
        Character::new(id, name)
            .with_attributes(Attributes {
                reaction,
                ..Attributes::default()
            })
            .with_skills(Skills {
                close_combat: 3,
                ..Skills::default()
            })
            .with_weapon(Weapon::melee("Club", WeaponType::Club, 5))
    }

    fn duel() -> MatchSetup {
        MatchSetup::new(vec![brawler(1, "Ash", 5), brawler(2, "Brick", 3)])
            .with_faction("Red", [1])
            .with_faction("Blue", [2])
    }

    #[test]
    fn start_places_and_orders() {
        let config = MatchConfig::default().with_initial_distance(6);
        let mut dice = ScriptedDice::new([1, 6]);
        let state = start_match(&duel(), &config, &mut dice).unwrap();
        let cs = state.combatants();
        // Ash 5+3+1 = 9, Brick 3+3+6 = 12
        assert_eq!(cs[0].name, "Brick");
        assert_eq!(cs[0].original_initiative, 12);
        assert_eq!(cs[0].position, Position::new(6, 0));
        assert_eq!(cs[1].position, Position::new(0, 0));
        assert_eq!(state.round(), 1);
        assert!(!state.is_over());
    }

    #[test]
    fn start_applies_modifiers() {
        let setup = duel().with_modifier(2, -3);
        let mut dice = ScriptedDice::new([3]);
        let state = start_match(&setup, &MatchConfig::default(), &mut dice).unwrap();
        assert_eq!(state.combatant(CharacterId(2)).unwrap().situational_modifier, -3);
        assert!(matches!(
            state.combatant(CharacterId(9)),
            Err(CombatError::UnknownCombatant(_))
        ));
    }

    #[test]
    fn start_rejects_bad_setups() {
        let mut dice = ScriptedDice::default();
        let lonely = MatchSetup::new(vec![brawler(1, "Ash", 3)]).with_faction("Red", [1]);
        assert!(start_match(&lonely, &MatchConfig::default(), &mut dice).is_err());
    }

    #[test]
    fn melee_fighter_advances_then_strikes() {
        let config = MatchConfig::default().with_initial_distance(10);
        // Initiative: Ash 9, Brick 7.
        let mut dice = ScriptedDice::new([1, 1]);
        let mut state = start_match(&duel(), &config, &mut dice).unwrap();

        // Agility 3 gives 6m: from 0 to 6, then a swing that comes up empty.
        let mut dice = ScriptedDice::new([2]);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.action, ActionKind::Attack);
        assert_eq!(step.result.moved, 6);
        assert_eq!(step.result.outcome, Some(AttackOutcome::Miss));
        assert!(step.result.narration[0].contains("moves 6m to (6, 0)"));
        assert_eq!(step.result.initiative_phase, 9);
        assert_eq!(step.result.round, 1);
        assert!(!step.ended);

        // Brick closes the remaining gap and swings.
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.action, ActionKind::Attack);
        assert!(step.result.moved > 0);
        assert_eq!(step.result.outcome, Some(AttackOutcome::Miss));

        // Both spent: round rolls over and initiative is restored.
        assert_eq!(state.round(), 2);
        assert_eq!(state.combatants()[0].current_initiative, 9);
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn movement_never_enters_hard_cover() {
        let mut map = GameMap::new(12, 3);
        for y in 0..3 {
            map.set(Position::new(3, y), CellType::HardCover);
        }
        let setup = duel().with_map(map);
        let mut dice = ScriptedDice::new([1, 1]);
        let mut state = start_match(&setup, &MatchConfig::default(), &mut dice).unwrap();

        // The way round through row -1 is off the map.
        let mut dice = ScriptedDice::new([2]);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.moved, 2);
        assert_eq!(state.combatant(CharacterId(1)).unwrap().position, Position::new(2, 0));
    }

    #[test]
    fn follower_steps_around_its_leader() {
        let tank = Character::new(3, "Tank")
            .with_attributes(Attributes {
                reaction: 1,
                ..Attributes::default()
            })
            .with_weapon(Weapon::ranged(
                "Pistol",
                WeaponType::HeavyPistol,
                7,
                &[FireMode::SemiAuto],
            ));
        let setup = MatchSetup::new(vec![brawler(1, "Lead", 6), brawler(2, "Follow", 5), tank])
            .with_faction("Red", [1, 2])
            .with_faction("Blue", [3]);
        // Nobody ever hits: Lead 11, Follow 10, Tank 6.
        let mut dice = ScriptedDice::new([2]);
        let mut state = start_match(&setup, &MatchConfig::default(), &mut dice).unwrap();

        // Round 1: Lead, Follow, Tank, then Lead's second phase.
        for _ in 0..4 {
            state.resolve_next_action(&mut dice).unwrap();
        }
        assert_eq!(state.round(), 2);
        // Follow took the free cell beside Lead's lane.
        assert_eq!(state.combatant(CharacterId(2)).unwrap().position, Position::new(6, -1));

        let lead = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(lead.result.actor, CharacterId(1));
        assert_eq!(state.combatant(CharacterId(1)).unwrap().position, Position::new(8, 0));

        // (8, 0) is taken, so Follow goes around it and ends in reach.
        let follow = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(follow.result.actor, CharacterId(2));
        assert_eq!(follow.result.moved, 2);
        assert_eq!(follow.result.action, ActionKind::Attack);
        let follow = state.combatant(CharacterId(2)).unwrap().position;
        assert_eq!(follow, Position::new(8, -1));
        assert!(follow.distance_to(Position::new(10, 0)) <= MatchConfig::default().melee_range);
    }

    struct RefusingPath;

    impl PathFinder for RefusingPath {
        fn path_length(&self, _: &GameMap, _: Position, _: Position, _: &[Position]) -> Option<u32> {
            None
        }
    }

    struct MuddyPath;

    impl PathFinder for MuddyPath {
        fn path_length(
            &self,
            _: &GameMap,
            from: Position,
            to: Position,
            _: &[Position],
        ) -> Option<u32> {
            Some(from.distance_to(to) * 2)
        }
    }

    #[test]
    fn rejected_path_leaves_actor_in_place() {
        let mut dice = ScriptedDice::new([1, 1]);
        let mut state = start_match(&duel(), &MatchConfig::default(), &mut dice)
            .unwrap()
            .with_pathfinder(Arc::new(RefusingPath));

        let mut dice = ScriptedDice::new([2]);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.actor, CharacterId(1));
        assert_eq!(step.result.moved, 0);
        let ash = state.combatant(CharacterId(1)).unwrap();
        assert_eq!(ash.position, Position::new(0, 0));
        assert_eq!(ash.movement_remaining, 6);
    }

    #[test]
    fn path_cost_is_charged_against_movement() {
        // 10m apart: six steps toward Brick would cost 12, twice what Ash has.
        let mut dice = ScriptedDice::new([1, 1]);
        let mut state = start_match(&duel(), &MatchConfig::default(), &mut dice)
            .unwrap()
            .with_pathfinder(Arc::new(MuddyPath));
        let mut dice = ScriptedDice::new([2]);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.moved, 0);
        assert_eq!(state.combatant(CharacterId(1)).unwrap().position, Position::new(0, 0));

        // 5m apart: 3 steps cost 6, exactly the allowance.
        let config = MatchConfig::default().with_initial_distance(5);
        let mut dice = ScriptedDice::new([1, 1]);
        let mut state = start_match(&duel(), &config, &mut dice)
            .unwrap()
            .with_pathfinder(Arc::new(MuddyPath));
        let mut dice = ScriptedDice::new([2]);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.moved, 6);
        let ash = state.combatant(CharacterId(1)).unwrap();
        assert_eq!(ash.position, Position::new(3, 0));
        assert_eq!(ash.movement_remaining, 0);
    }

    #[test]
    fn roster_movement_flags_reach_the_fight() {
        let setup = duel().with_running(2).with_sprinting(2);
        let config = MatchConfig::default().with_initial_distance(1);
        let mut dice = ScriptedDice::new([1, 1]);
        let mut state = start_match(&setup, &config, &mut dice).unwrap();
        let brick = state.combatant(CharacterId(2)).unwrap();
        assert!(brick.is_running && brick.is_sprinting);
        assert_eq!(brick.movement_remaining, 12);
        assert!(!state.combatant(CharacterId(1)).unwrap().is_running);

        // Ash swings at a running target.
        let mut dice = ScriptedDice::new([2]);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert!(step.result.narration.iter().any(|l| l.contains("running target")));
    }

    #[test]
    fn knockout_ends_the_match() {
        let config = MatchConfig::default().with_initial_distance(1);
        let mut dice = ScriptedDice::new([1, 1]);
        let mut state = start_match(&duel(), &config, &mut dice).unwrap();

        // Ash: 6 hits capped at 5, Brick rolls none, resists none: 5 + 5 = 10.
        let mut dice = ScriptedDice::default().then(6, 6).then(2, 9);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.damage_dealt, 10);
        assert!(!step.ended);

        // Brick, down three dice, glitches the swing away.
        let mut dice = ScriptedDice::new([1, 1, 5]);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.outcome, Some(AttackOutcome::Glitch));
        assert_eq!(state.round(), 2);

        let mut dice = ScriptedDice::default().then(6, 6).then(2, 9);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert!(step.ended);
        assert_eq!(
            state.outcome(),
            Some(&MatchOutcome::Victory {
                faction: "Red".into()
            })
        );
        assert!(matches!(
            state.resolve_next_action(&mut dice),
            Err(CombatError::MatchOver)
        ));

        let result = state.into_result();
        assert_eq!(result.actions.len(), 3);
        assert!(!result.hit_round_cap);
        let brick = result.summaries.iter().find(|s| s.name == "Brick").unwrap();
        assert!(!brick.is_alive);
        let ash = result.summaries.iter().find(|s| s.name == "Ash").unwrap();
        assert_eq!(ash.damage_dealt, 20);
    }

    #[test]
    fn round_cap_calls_it_on_headcount() {
        let setup = MatchSetup::new(vec![
            brawler(1, "Ash", 3),
            brawler(2, "Brick", 3),
            brawler(3, "Cinder", 3),
        ])
        .with_faction("Red", [1, 3])
        .with_faction("Blue", [2]);
        let config = MatchConfig::default()
            .with_initial_distance(200)
            .with_round_cap(2);
        // Everyone walks and swings at thin air; nobody ever lands a hit.
        let mut dice = ScriptedDice::new([2]);
        let mut state = start_match(&setup, &config, &mut dice).unwrap();
        state.run(&mut dice).unwrap();

        let result = state.into_result();
        assert!(result.hit_round_cap);
        assert_eq!(result.rounds, 2);
        assert_eq!(result.actions.len(), 6);
        assert_eq!(result.outcome.winner(), Some("Red"));
    }

    #[test]
    fn round_cap_draw_on_level_headcount() {
        let config = MatchConfig::default()
            .with_initial_distance(200)
            .with_round_cap(1);
        let mut dice = ScriptedDice::new([2]);
        let mut state = start_match(&duel(), &config, &mut dice).unwrap();
        state.run(&mut dice).unwrap();
        assert_eq!(state.outcome(), Some(&MatchOutcome::Draw));
    }

    #[test]
    fn failed_action_restores_state() {
        let thrower = Character::new(1, "Nix")
            .with_attributes(Attributes {
                strength: 0,
                ..Attributes::default()
            })
            .with_weapon(Weapon::ranged(
                "Shuriken",
                WeaponType::Shuriken,
                2,
                &[FireMode::SingleShot],
            ));
        let setup = MatchSetup::new(vec![thrower, brawler(2, "Brick", 1)])
            .with_faction("Red", [1])
            .with_faction("Blue", [2]);
        let mut dice = ScriptedDice::new([6, 1]);
        let mut state = start_match(&setup, &MatchConfig::default(), &mut dice).unwrap();
        let before = state.combatants().to_vec();

        let err = state.resolve_next_action(&mut dice).unwrap_err();
        assert!(matches!(err, CombatError::InvalidInput(_)));
        assert_eq!(state.combatants()[0].current_initiative, before[0].current_initiative);
        assert!(state.history().is_empty());
    }

    #[test]
    fn empty_gun_is_reloaded_then_fired() {
        let mut gun = Weapon::ranged("Pistol", WeaponType::LightPistol, 6, &[FireMode::SemiAuto])
            .with_magazine(2);
        gun.expend(2);
        let shooter = Character::new(1, "Dot")
            .with_attributes(Attributes {
                reaction: 6,
                ..Attributes::default()
            })
            .with_weapon(gun);
        let setup = MatchSetup::new(vec![shooter, brawler(2, "Brick", 1)])
            .with_faction("Red", [1])
            .with_faction("Blue", [2]);
        let mut dice = ScriptedDice::new([6, 1]);
        let mut state = start_match(&setup, &MatchConfig::default(), &mut dice).unwrap();

        let mut dice = ScriptedDice::new([2]);
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.action, ActionKind::Reload);
        assert_eq!(step.result.weapon.as_deref(), Some("Pistol"));

        // Dot, down to 5, still beats Brick's 5 on order: now the gun fires.
        let step = state.resolve_next_action(&mut dice).unwrap();
        assert_eq!(step.result.action, ActionKind::Attack);
        assert_eq!(step.result.rounds_fired, 1);
        let dot = state.combatant(CharacterId(1)).unwrap();
        assert!(!dot.weapons[0].needs_reload());
    }

    #[test]
    fn seeded_matches_repeat() {
        let config = MatchConfig::default().with_seed(9);
        let a = run_match(&duel(), &config).unwrap();
        let b = run_match(&duel(), &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn pair_mut_either_order() {
        let mut v = vec![1, 2, 3];
        let (a, b) = pair_mut(&mut v, 2, 0);
        std::mem::swap(a, b);
        assert_eq!(v, vec![3, 2, 1]);
    }
}
