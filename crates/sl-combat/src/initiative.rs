//! Initiative scheduling: phases, the decrement-by-ten, and round rollover.
//!
//! Every combatant rolls once per match. Acting costs ten points of
//! initiative; whoever has the most left (and more than zero) goes next.
//! When nobody standing has any left, everyone's score resets to the
//! original roll and a new round begins.

use crate::combatant::Combatant;
use crate::dice::{DiceSource, roll_pool};
use crate::status::wound_modifier;

/// Initiative spent by one action.
pub const PHASE_COST: i32 = 10;

/// Roll `REA + INT + Nd6` and store it as both original and current initiative.
pub fn roll_initiative(c: &mut Combatant, dice: &mut dyn DiceSource) -> i32 {
    let rolled: u32 = roll_pool(c.initiative_dice, dice).iter().sum();
    let score = (c.attributes.reaction + c.attributes.intuition + rolled) as i32;
    c.original_initiative = score;
    c.current_initiative = score;
    score
}

/// Stable sort, highest original initiative first.
pub fn sort_by_initiative(combatants: &mut [Combatant]) {
    combatants.sort_by(|a, b| b.original_initiative.cmp(&a.original_initiative));
}

/// Index of the next combatant to act, if anyone standing has initiative left.
///
/// Ties go to whoever comes first in the slice.
pub fn next_actor(combatants: &[Combatant]) -> Option<usize> {
    combatants
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_conscious && c.current_initiative > 0)
        .fold(None, |best: Option<(usize, i32)>, (i, c)| match best {
            Some((_, score)) if score >= c.current_initiative => best,
            _ => Some((i, c.current_initiative)),
        })
        .map(|(i, _)| i)
}

/// True when no conscious combatant has initiative left this round.
pub fn round_exhausted(combatants: &[Combatant]) -> bool {
    !combatants
        .iter()
        .any(|c| c.is_conscious && c.current_initiative >= 1)
}

/// Spend one action's worth of initiative.
pub fn end_action(c: &mut Combatant) {
    c.current_initiative -= PHASE_COST;
}

/// Start a new round: restore every initiative score and movement allowance.
pub fn reset_round(combatants: &mut [Combatant]) {
    for c in combatants {
        c.current_initiative = c.original_initiative;
        c.movement_remaining = c.movement_allowance();
    }
}

/// Initiative shown to players: the roll less the wound modifier.
///
/// Cosmetic only; scheduling always uses the unmodified score.
pub fn display_initiative(c: &Combatant) -> i32 {
    c.original_initiative - wound_modifier(c) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Attributes, Character};
    use crate::dice::ScriptedDice;
    use crate::map::Position;

    fn combatant(id: u32, initiative: i32) -> Combatant {
        let mut c = Combatant::from_character(
            &Character::new(id, format!("C{id}")),
            "A",
            0,
            Position::default(),
        );
        c.original_initiative = initiative;
        c.current_initiative = initiative;
        c
    }

    #[test]
    fn roll_adds_attributes_and_dice() {
        let character = Character::new(1, "Zip")
            .with_attributes(Attributes {
                reaction: 5,
                intuition: 4,
                ..Attributes::default()
            })
            .with_initiative_dice(2);
        let mut c = Combatant::from_character(&character, "A", 0, Position::default());
        let mut dice = ScriptedDice::new([3, 6]);
        assert_eq!(roll_initiative(&mut c, &mut dice), 18);
        assert_eq!(c.original_initiative, 18);
        assert_eq!(c.current_initiative, 18);
    }

    #[test]
    fn highest_goes_first() {
        let cs = vec![combatant(1, 8), combatant(2, 15), combatant(3, 11)];
        assert_eq!(next_actor(&cs), Some(1));
    }

    #[test]
    fn ties_keep_slice_order() {
        let cs = vec![combatant(1, 12), combatant(2, 12)];
        assert_eq!(next_actor(&cs), Some(0));
    }

    #[test]
    fn unconscious_never_acts() {
        let mut cs = vec![combatant(1, 20), combatant(2, 5)];
        cs[0].is_conscious = false;
        assert_eq!(next_actor(&cs), Some(1));
    }

    #[test]
    fn decrement_and_reset() {
        let mut cs = vec![combatant(1, 12)];
        end_action(&mut cs[0]);
        assert_eq!(cs[0].current_initiative, 2);
        assert!(!round_exhausted(&cs));
        assert_eq!(next_actor(&cs), Some(0));

        end_action(&mut cs[0]);
        assert_eq!(cs[0].current_initiative, -8);
        assert!(round_exhausted(&cs));
        assert_eq!(next_actor(&cs), None);

        reset_round(&mut cs);
        assert_eq!(cs[0].current_initiative, 12);
    }

    #[test]
    fn reset_restores_whole_group_and_movement() {
        let mut cs = vec![combatant(1, 12), combatant(2, 7)];
        cs[0].current_initiative = -8;
        cs[1].current_initiative = -3;
        cs[1].movement_remaining = 0;
        reset_round(&mut cs);
        assert_eq!(cs[0].current_initiative, 12);
        assert_eq!(cs[1].current_initiative, 7);
        assert_eq!(cs[1].movement_remaining, cs[1].movement_allowance());
    }

    #[test]
    fn sort_is_descending() {
        let mut cs = vec![combatant(1, 8), combatant(2, 15), combatant(3, 8)];
        sort_by_initiative(&mut cs);
        let ids: Vec<u32> = cs.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn display_initiative_subtracts_wounds() {
        let mut c = combatant(1, 14);
        c.physical_damage = 6;
        assert_eq!(display_initiative(&c), 12);
        assert_eq!(c.original_initiative, 14);
    }
}
