//! Deterministic target and weapon choice.

use crate::character::Weapon;
use crate::combatant::Combatant;
use crate::error::{CombatError, CombatResult};
use crate::tables::range_modifier;

/// What the actor will do with its weapons this action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponChoice {
    /// Attack with the weapon at this index.
    Use(usize),
    /// Spend the action reloading the weapon at this index.
    Reload(usize),
}

/// First standing combatant of another faction, in initiative order.
pub fn pick_target(combatants: &[Combatant], actor: usize) -> Option<usize> {
    let faction = &combatants.get(actor)?.faction;
    combatants
        .iter()
        .position(|c| c.is_standing() && &c.faction != faction)
}

/// Pick the weapon for an attack at `distance`.
///
/// In order of preference:
/// 1. the first melee weapon, if the target is within `melee_range`
/// 2. the loaded ranged weapon with the least severe range modifier
///    (earliest wins a tie)
/// 3. the first melee weapon at any distance
/// 4. reloading the first empty ranged weapon
///
/// An actor with no weapons at all is [`CombatError::InvalidInput`].
pub fn select_best_weapon(
    actor: &Combatant,
    distance: u32,
    melee_range: u32,
) -> CombatResult<WeaponChoice> {
    let first_melee = actor.weapons.iter().position(Weapon::is_melee);
    if distance <= melee_range {
        if let Some(i) = first_melee {
            return Ok(WeaponChoice::Use(i));
        }
    }

    let strength = Some(actor.attributes.strength).filter(|&s| s > 0);
    let mut best: Option<(usize, i32)> = None;
    for (i, weapon) in actor.weapons.iter().enumerate() {
        let Some(mode) = weapon.fire_mode() else {
            continue;
        };
        if !weapon.can_fire(mode) {
            continue;
        }
        let modifier = range_modifier(weapon.weapon_type, distance, strength)?;
        if best.is_none_or(|(_, m)| modifier > m) {
            best = Some((i, modifier));
        }
    }

    if let Some((i, _)) = best {
        return Ok(WeaponChoice::Use(i));
    }
    if let Some(i) = first_melee {
        return Ok(WeaponChoice::Use(i));
    }
    actor
        .weapons
        .iter()
        .position(Weapon::needs_reload)
        .map(WeaponChoice::Reload)
        .ok_or_else(|| CombatError::invalid(format!("{} has no usable weapon", actor.name)))
}
