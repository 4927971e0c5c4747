//! Range brackets per weapon type.

use crate::character::WeaponType;
use crate::error::{CombatError, CombatResult};

/// Distance band of a ranged attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RangeBracket {
    /// No penalty.
    Short,
    /// -1 die.
    Medium,
    /// -3 dice.
    Long,
    /// -6 dice; also used for anything beyond the table.
    Extreme,
}

impl RangeBracket {
    /// All brackets, nearest first.
    pub const ALL: [RangeBracket; 4] = [Self::Short, Self::Medium, Self::Long, Self::Extreme];

    /// Dice-pool modifier for attacks in this bracket.
    pub fn modifier(self) -> i32 {
        match self {
            Self::Short => 0,
            Self::Medium => -1,
            Self::Long => -3,
            Self::Extreme => -6,
        }
    }
}

impl std::fmt::Display for RangeBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Medium => write!(f, "medium"),
            Self::Long => write!(f, "long"),
            Self::Extreme => write!(f, "extreme"),
        }
    }
}

/// Upper bound of each bracket, Short through Extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeTable {
    /// Bounds in metres.
    Fixed([u32; 4]),
    /// Bounds as multiples of the wielder's strength.
    StrengthScaled([u32; 4]),
}

impl RangeTable {
    /// Resolve the bounds in metres.
    pub fn bounds(self, strength: Option<u32>) -> CombatResult<[u32; 4]> {
        match self {
            Self::Fixed(bounds) => Ok(bounds),
            Self::StrengthScaled(multipliers) => {
                let strength = strength.ok_or_else(|| {
                    CombatError::invalid("strength is required for strength-scaled ranges")
                })?;
                Ok(multipliers.map(|m| m.saturating_mul(strength)))
            }
        }
    }
}

/// The range table for a weapon type.
pub fn range_table(weapon_type: WeaponType) -> CombatResult<RangeTable> {
    use RangeTable::{Fixed, StrengthScaled};
    use WeaponType as W;

    let table = match weapon_type {
        W::Taser => Fixed([5, 10, 15, 20]),
        W::HoldOutPistol | W::LightPistol | W::MachinePistol => Fixed([5, 15, 30, 50]),
        W::HeavyPistol => Fixed([5, 20, 40, 60]),
        W::Smg => Fixed([10, 40, 80, 150]),
        W::AssaultRifle => Fixed([25, 150, 350, 550]),
        W::Shotgun => Fixed([10, 40, 80, 150]),
        W::SniperRifle => Fixed([50, 350, 800, 1500]),
        W::LightMachineGun => Fixed([25, 200, 400, 800]),
        W::HeavyMachineGun => Fixed([40, 250, 750, 1200]),
        W::AssaultCannon => Fixed([50, 300, 750, 1500]),
        W::GrenadeLauncher => Fixed([50, 100, 150, 500]),
        W::MissileLauncher => Fixed([70, 150, 450, 1500]),
        W::LightCrossbow => Fixed([6, 24, 60, 120]),
        W::MediumCrossbow => Fixed([9, 36, 90, 150]),
        W::HeavyCrossbow => Fixed([15, 45, 120, 180]),
        W::Bow => StrengthScaled([1, 10, 30, 60]),
        W::ThrowingKnife => StrengthScaled([1, 2, 3, 5]),
        W::Shuriken => StrengthScaled([1, 2, 5, 7]),
        W::Grenade => StrengthScaled([2, 4, 6, 10]),
        W::Unarmed | W::Blade | W::Club | W::Polearm => {
            return Err(CombatError::Configuration(format!(
                "no range table for melee weapon type {weapon_type:?}"
            )));
        }
    };
    Ok(table)
}

/// Which bracket `distance` falls into. Beyond the table clamps to Extreme.
pub fn range_bracket(
    weapon_type: WeaponType,
    distance: u32,
    strength: Option<u32>,
) -> CombatResult<RangeBracket> {
    let bounds = range_table(weapon_type)?.bounds(strength)?;
    Ok(RangeBracket::ALL
        .into_iter()
        .zip(bounds)
        .find(|&(_, upper)| distance <= upper)
        .map(|(bracket, _)| bracket)
        .unwrap_or(RangeBracket::Extreme))
}

/// Dice-pool modifier for a ranged attack at `distance`.
pub fn range_modifier(
    weapon_type: WeaponType,
    distance: u32,
    strength: Option<u32>,
) -> CombatResult<i32> {
    range_bracket(weapon_type, distance, strength).map(RangeBracket::modifier)
}
