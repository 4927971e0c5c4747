//! Opposed-test attack resolution.
//!
//! An attack runs five stages in strict order, each consuming dice from the
//! same [`DiceSource`]:
//!
//! 1. assemble the attack pool (melee and ranged differ here)
//! 2. roll it; glitches end the action, otherwise cap hits by the physical limit
//! 3. roll the defender's reaction + intuition
//! 4. turn net hits into a damage value against modified armour
//! 5. roll body + armour to resist, then apply what gets through
//!
//! Every intermediate figure is narrated on the returned [`RoundResult`].
//! All validation happens before the first die is rolled, so an `Err`
//! leaves both combatants untouched.

pub mod pool;
pub mod result;

pub use pool::PoolBreakdown;
pub use result::{ActionKind, AttackOutcome, RoundResult};

use crate::character::{DamageType, FireMode, Weapon};
use crate::combatant::Combatant;
use crate::dice::{DiceSource, PoolRoll};
use crate::error::{CombatError, CombatResult};
use crate::map::GameMap;
use crate::status::{StatusChange, apply_damage, condition_label, wound_modifier};
use crate::tables::{
    RUNNING_TARGET_PENALTY, RangeBracket, Recoil, fire_mode_defense_modifier, physical_limit,
    range_bracket, recoil,
};

/// Ranged specifics worked out before rolling.
#[derive(Debug, Clone, Copy)]
struct RangedPlan {
    mode: FireMode,
    bracket: RangeBracket,
    recoil: Recoil,
}

/// Check the inputs and work out everything that doesn't need dice.
fn plan_attack(
    attacker: &Combatant,
    defender: &Combatant,
    weapon: &Weapon,
    fire_mode: Option<FireMode>,
    distance: u32,
) -> CombatResult<(PoolBreakdown, Option<RangedPlan>)> {
    if attacker.id == defender.id {
        return Err(CombatError::invalid(format!(
            "{} cannot attack themselves",
            attacker.name
        )));
    }
    if !attacker.is_standing() {
        return Err(CombatError::invalid(format!("{} cannot act", attacker.name)));
    }
    if !defender.is_alive {
        return Err(CombatError::invalid(format!("{} is already dead", defender.name)));
    }
    weapon.validate()?;

    let wounds = wound_modifier(attacker) as i32;
    let running_target = defender.is_running;

    let Some(current) = weapon.fire_mode() else {
        let reach = (weapon.reach() + attacker.metatype.reach_bonus()) as i32
            - defender.melee_reach() as i32;
        let pool = PoolBreakdown::new()
            .add("agility", attacker.attributes.agility as i32)
            .add("close combat", attacker.skills.close_combat as i32)
            .add("reach", reach)
            .add("wounds", -wounds)
            .add("situational", attacker.situational_modifier)
            .add_if(running_target, "running target", -RUNNING_TARGET_PENALTY);
        return Ok((pool, None));
    };

    let mode = fire_mode.unwrap_or(current);
    if !weapon.offers(mode) {
        return Err(CombatError::invalid(format!(
            "{} does not support {mode}",
            weapon.name
        )));
    }
    if !weapon.can_fire(mode) {
        return Err(CombatError::invalid(format!(
            "{} is out of ammunition for {mode}",
            weapon.name
        )));
    }

    let strength = Some(attacker.attributes.strength).filter(|&s| s > 0);
    let bracket = range_bracket(weapon.weapon_type, distance, strength)?;
    let recoil = recoil(attacker.recoil, mode.rounds(), weapon.recoil_compensation());

    let pool = PoolBreakdown::new()
        .add("agility", attacker.attributes.agility as i32)
        .add("firearms", attacker.skills.firearms as i32)
        .add(format!("{bracket} range"), bracket.modifier())
        .add("recoil", -(recoil.penalty as i32))
        .add("wounds", -wounds)
        .add("situational", attacker.situational_modifier)
        .add_if(running_target, "running target", -RUNNING_TARGET_PENALTY);

    Ok((
        pool,
        Some(RangedPlan {
            mode,
            bracket,
            recoil,
        }),
    ))
}

/// Resolve one attack of `attacker` against `defender`.
///
/// `weapon` is a copy of the attacker's weapon; ammunition is not deducted
/// here (see [`RoundResult::rounds_fired`]). `fire_mode` overrides the
/// weapon's current mode for ranged weapons and is ignored for melee.
/// `map` enables cover bonuses.
pub fn resolve_attack(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    weapon: &Weapon,
    fire_mode: Option<FireMode>,
    distance: u32,
    map: Option<&GameMap>,
    dice: &mut dyn DiceSource,
) -> CombatResult<RoundResult> {
    let (attack_pool, ranged) = plan_attack(attacker, defender, weapon, fire_mode, distance)?;

    let mut result = RoundResult::new(attacker.id, &attacker.name, ActionKind::Attack);
    result.initiative_phase = attacker.current_initiative;
    result.target = Some(defender.id);
    result.weapon = Some(weapon.name.clone());
    result.fire_mode = ranged.map(|r| r.mode);

    match ranged {
        Some(plan) => {
            result.narrate(format!(
                "{} fires {} at {} ({}m, {} range, {}).",
                attacker.name, weapon, defender.name, distance, plan.bracket, plan.mode
            ));
            result.rounds_fired = plan.mode.rounds();
            attacker.recoil += plan.recoil.added;
        }
        None => result.narrate(format!(
            "{} attacks {} with {}.",
            attacker.name, defender.name, weapon
        )),
    }

    // Stage 1-2: attack roll.
    result.narrate(format!("Attack pool: {attack_pool}"));
    let attack = PoolRoll::roll(attack_pool.dice(), dice);
    result.narrate(format!("Attack roll: {attack}"));
    result.attack_roll = Some(attack.clone());

    if attack.is_critical_glitch {
        let self_damage = dice.d6();
        let changes = apply_damage(attacker, self_damage, DamageType::Stun);
        result.narrate(format!(
            "{} critically glitches and takes {} stun ({}).",
            attacker.name,
            self_damage,
            condition_label(attacker)
        ));
        return Ok(finish(
            result,
            AttackOutcome::CriticalGlitch { self_damage },
            changes,
        ));
    }
    if attack.is_glitch {
        result.narrate(format!("{} glitches; the attack goes nowhere.", attacker.name));
        return Ok(finish(result, AttackOutcome::Glitch, Vec::new()));
    }

    let limit = physical_limit(&attacker.attributes);
    let limited = attack.limited_hits(limit);
    result.limited_hits = limited;
    if limited < attack.hits {
        result.narrate(format!(
            "{} hits capped at {} by physical limit.",
            attack.hits, limited
        ));
    }

    // Stage 3: defence.
    let cover = match (map, defender.active_cover()) {
        (Some(map), Some(cells)) => map.cover_bonus(cells, attacker.position, defender.position),
        _ => 0,
    };
    let defense_pool = PoolBreakdown::new()
        .add("reaction", defender.attributes.reaction as i32)
        .add("intuition", defender.attributes.intuition as i32)
        .add(
            "fire mode",
            ranged.map_or(0, |r| fire_mode_defense_modifier(r.mode)),
        )
        .add("wounds", -(wound_modifier(defender) as i32))
        .add("situational", defender.situational_modifier)
        .add("cover", cover);
    result.narrate(format!("Defense pool: {defense_pool}"));
    let defense = PoolRoll::roll(defense_pool.dice(), dice);
    result.narrate(format!("Defense roll: {defense}"));
    result.defense_roll = Some(defense.clone());

    let net = limited as i32 - defense.hits as i32;
    result.net_hits = net;
    if net <= 0 {
        result.narrate(format!(
            "{} evades ({} vs {} hits).",
            defender.name, limited, defense.hits
        ));
        return Ok(finish(result, AttackOutcome::Miss, Vec::new()));
    }

    // Stage 4: damage value against modified armour.
    let damage_value = weapon.damage + net as u32;
    let armor = defender.skills.armor as i32 + weapon.armor_penetration;
    result.narrate(format!(
        "Damage value {}{} ({} base + {} net hits); armour {} with AP {} = {}.",
        damage_value,
        weapon.damage_type,
        weapon.damage,
        net,
        defender.skills.armor,
        weapon.armor_penetration,
        armor
    ));

    // Stage 5: resistance. Only ranged attacks strip the defender's wounds here.
    let resist_pool = PoolBreakdown::new()
        .add("body", defender.attributes.body as i32)
        .add("armor", armor.max(0))
        .add("situational", defender.situational_modifier)
        .add_if(
            ranged.is_some(),
            "wounds",
            -(wound_modifier(defender) as i32),
        );
    result.narrate(format!("Resistance pool: {resist_pool}"));
    let resistance = PoolRoll::roll(resist_pool.dice(), dice);
    result.narrate(format!("Resistance roll: {resistance}"));
    result.resistance_roll = Some(resistance.clone());

    let applied = damage_value.saturating_sub(resistance.hits);
    if applied == 0 {
        result.narrate(format!("{} soaks the whole hit.", defender.name));
        return Ok(finish(result, AttackOutcome::Resisted, Vec::new()));
    }

    let changes = apply_damage(defender, applied, weapon.damage_type);
    attacker.damage_dealt += applied;
    result.damage_dealt = applied;
    result.damage_type = Some(weapon.damage_type);
    result.narrate(format!(
        "{} takes {}{} damage ({}).",
        defender.name,
        applied,
        weapon.damage_type,
        condition_label(defender)
    ));
    Ok(finish(
        result,
        AttackOutcome::Hit { damage: applied },
        changes,
    ))
}

fn finish(
    mut result: RoundResult,
    outcome: AttackOutcome,
    changes: Vec<StatusChange>,
) -> RoundResult {
    for change in &changes {
        result.narrate(format!("{change}."));
    }
    tracing::debug!(
        "{} attacks: {} ({} net hits)",
        result.actor_name,
        outcome,
        result.net_hits
    );
    result.outcome = Some(outcome);
    result.status_changes = changes;
    result
}
