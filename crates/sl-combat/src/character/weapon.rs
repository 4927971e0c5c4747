//! Weapons, fire modes, and ammunition.

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, CombatResult};

/// Which damage track a weapon hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Wounds; overflow kills.
    #[default]
    Physical,
    /// Fatigue and bruising; overflow spills into physical.
    Stun,
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Physical => write!(f, "P"),
            Self::Stun => write!(f, "S"),
        }
    }
}

/// Weapon family, used to look up range brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum WeaponType {
    // Melee
    Unarmed,
    Blade,
    Club,
    Polearm,
    // Firearms
    Taser,
    HoldOutPistol,
    LightPistol,
    HeavyPistol,
    MachinePistol,
    Smg,
    AssaultRifle,
    Shotgun,
    SniperRifle,
    LightMachineGun,
    HeavyMachineGun,
    AssaultCannon,
    GrenadeLauncher,
    MissileLauncher,
    // Projectile and thrown
    LightCrossbow,
    MediumCrossbow,
    HeavyCrossbow,
    Bow,
    ThrowingKnife,
    Shuriken,
    Grenade,
}

impl WeaponType {
    /// True for weapon families fought with in close combat.
    pub fn is_melee(self) -> bool {
        matches!(self, Self::Unarmed | Self::Blade | Self::Club | Self::Polearm)
    }
}

/// How many rounds a ranged attack expends and how hard it is to dodge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireMode {
    /// One round, one trigger pull.
    SingleShot,
    /// One round, fast follow-up.
    SemiAuto,
    /// Three-round burst.
    BurstFire,
    /// Six-round spray.
    FullAuto,
}

impl FireMode {
    /// Rounds expended by one attack in this mode.
    pub fn rounds(self) -> u32 {
        match self {
            Self::SingleShot | Self::SemiAuto => 1,
            Self::BurstFire => 3,
            Self::FullAuto => 6,
        }
    }
}

impl std::fmt::Display for FireMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleShot => write!(f, "SS"),
            Self::SemiAuto => write!(f, "SA"),
            Self::BurstFire => write!(f, "BF"),
            Self::FullAuto => write!(f, "FA"),
        }
    }
}

/// A detachable magazine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Magazine {
    /// Rounds currently loaded.
    pub loaded: u32,
    /// Rounds in a full magazine.
    pub capacity: u32,
}

impl Magazine {
    /// A full magazine.
    pub fn full(capacity: u32) -> Self {
        Self {
            loaded: capacity,
            capacity,
        }
    }
}

/// Coarse category, for callers that only need to branch on melee vs ranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponCategory {
    /// Close combat.
    Melee,
    /// Anything fired or thrown.
    Ranged,
}

/// Category-specific weapon data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum WeaponClass {
    /// Close-combat weapon.
    Melee {
        /// Extra reach in metres beyond arm's length.
        #[serde(default)]
        reach: u32,
    },
    /// Fired or thrown weapon.
    Ranged {
        /// Modes the weapon supports. Never empty on a valid weapon.
        fire_modes: Vec<FireMode>,
        /// Selected mode, drawn from `fire_modes`.
        current_mode: FireMode,
        /// Rounds of recoil absorbed before penalties apply.
        #[serde(default)]
        recoil_compensation: u32,
        /// Ammunition, if the weapon tracks it.
        #[serde(default)]
        magazine: Option<Magazine>,
    },
}

/// A weapon owned by a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Display name.
    pub name: String,
    /// Family used for range lookups.
    pub weapon_type: WeaponType,
    /// Base damage value.
    pub damage: u32,
    /// Damage track.
    #[serde(default)]
    pub damage_type: DamageType,
    /// Armour penetration; usually zero or negative.
    #[serde(default)]
    pub armor_penetration: i32,
    /// Accuracy rating, reported in narration.
    #[serde(default)]
    pub accuracy: u32,
    /// Melee or ranged specifics.
    #[serde(flatten)]
    pub class: WeaponClass,
}

impl Weapon {
    /// A melee weapon with no reach.
    pub fn melee(name: impl Into<String>, weapon_type: WeaponType, damage: u32) -> Self {
        Self {
            name: name.into(),
            weapon_type,
            damage,
            damage_type: DamageType::Physical,
            armor_penetration: 0,
            accuracy: 0,
            class: WeaponClass::Melee { reach: 0 },
        }
    }

    /// A ranged weapon; the first listed fire mode becomes current.
    ///
    /// An empty mode list yields a weapon that fails [`Weapon::validate`].
    pub fn ranged(
        name: impl Into<String>,
        weapon_type: WeaponType,
        damage: u32,
        fire_modes: &[FireMode],
    ) -> Self {
        Self {
            name: name.into(),
            weapon_type,
            damage,
            damage_type: DamageType::Physical,
            armor_penetration: 0,
            accuracy: 0,
            class: WeaponClass::Ranged {
                fire_modes: fire_modes.to_vec(),
                current_mode: fire_modes.first().copied().unwrap_or(FireMode::SingleShot),
                recoil_compensation: 0,
                magazine: None,
            },
        }
    }

    /// Deal stun instead of physical damage.
    pub fn stun(mut self) -> Self {
        self.damage_type = DamageType::Stun;
        self
    }

    /// Set armour penetration.
    pub fn with_ap(mut self, ap: i32) -> Self {
        self.armor_penetration = ap;
        self
    }

    /// Set accuracy.
    pub fn with_accuracy(mut self, accuracy: u32) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set reach. Ignored for ranged weapons.
    pub fn with_reach(mut self, value: u32) -> Self {
        if let WeaponClass::Melee { reach } = &mut self.class {
            *reach = value;
        }
        self
    }

    /// Set recoil compensation. Ignored for melee weapons.
    pub fn with_recoil_compensation(mut self, value: u32) -> Self {
        if let WeaponClass::Ranged {
            recoil_compensation,
            ..
        } = &mut self.class
        {
            *recoil_compensation = value;
        }
        self
    }

    /// Load a full magazine of the given capacity. Ignored for melee weapons.
    pub fn with_magazine(mut self, capacity: u32) -> Self {
        if let WeaponClass::Ranged { magazine, .. } = &mut self.class {
            *magazine = Some(Magazine::full(capacity));
        }
        self
    }

    /// Switch the current fire mode if the weapon offers it.
    pub fn with_fire_mode(mut self, mode: FireMode) -> Self {
        match &mut self.class {
            WeaponClass::Ranged {
                fire_modes,
                current_mode,
                ..
            } if fire_modes.contains(&mode) => *current_mode = mode,
            _ => {}
        }
        self
    }

    /// Melee or ranged.
    pub fn category(&self) -> WeaponCategory {
        match self.class {
            WeaponClass::Melee { .. } => WeaponCategory::Melee,
            WeaponClass::Ranged { .. } => WeaponCategory::Ranged,
        }
    }

    /// True for melee weapons.
    pub fn is_melee(&self) -> bool {
        self.category() == WeaponCategory::Melee
    }

    /// Weapon reach; zero for ranged weapons.
    pub fn reach(&self) -> u32 {
        match self.class {
            WeaponClass::Melee { reach } => reach,
            WeaponClass::Ranged { .. } => 0,
        }
    }

    /// Current fire mode of a ranged weapon.
    pub fn fire_mode(&self) -> Option<FireMode> {
        match self.class {
            WeaponClass::Melee { .. } => None,
            WeaponClass::Ranged { current_mode, .. } => Some(current_mode),
        }
    }

    /// Recoil compensation of a ranged weapon; zero for melee.
    pub fn recoil_compensation(&self) -> u32 {
        match self.class {
            WeaponClass::Melee { .. } => 0,
            WeaponClass::Ranged {
                recoil_compensation,
                ..
            } => recoil_compensation,
        }
    }

    /// True if the weapon has `mode` among its fire modes.
    pub fn offers(&self, mode: FireMode) -> bool {
        match &self.class {
            WeaponClass::Melee { .. } => false,
            WeaponClass::Ranged { fire_modes, .. } => fire_modes.contains(&mode),
        }
    }

    /// True if the weapon can fire `mode` right now, ammunition included.
    ///
    /// Melee weapons can always be used and ignore the mode.
    pub fn can_fire(&self, mode: FireMode) -> bool {
        match &self.class {
            WeaponClass::Melee { .. } => true,
            WeaponClass::Ranged {
                fire_modes,
                magazine,
                ..
            } => {
                fire_modes.contains(&mode)
                    && magazine.is_none_or(|m| m.loaded >= mode.rounds())
            }
        }
    }

    /// True if a ranged weapon is short of ammunition for its current mode.
    pub fn needs_reload(&self) -> bool {
        match &self.class {
            WeaponClass::Melee { .. } => false,
            WeaponClass::Ranged {
                current_mode,
                magazine,
                ..
            } => magazine.is_some_and(|m| m.loaded < current_mode.rounds()),
        }
    }

    /// Remove `rounds` from the magazine, if any.
    pub fn expend(&mut self, rounds: u32) {
        if let WeaponClass::Ranged {
            magazine: Some(m), ..
        } = &mut self.class
        {
            m.loaded = m.loaded.saturating_sub(rounds);
        }
    }

    /// Refill the magazine to capacity. Returns true if anything was loaded.
    pub fn reload(&mut self) -> bool {
        match &mut self.class {
            WeaponClass::Ranged {
                magazine: Some(m), ..
            } if m.loaded < m.capacity => {
                m.loaded = m.capacity;
                true
            }
            _ => false,
        }
    }

    /// Check the weapon against the data-table invariants.
    pub fn validate(&self) -> CombatResult<()> {
        match &self.class {
            WeaponClass::Melee { .. } => Ok(()),
            WeaponClass::Ranged {
                fire_modes,
                current_mode,
                ..
            } => {
                if fire_modes.is_empty() {
                    return Err(CombatError::Configuration(format!(
                        "ranged weapon '{}' has no fire modes",
                        self.name
                    )));
                }
                if !fire_modes.contains(current_mode) {
                    return Err(CombatError::Configuration(format!(
                        "weapon '{}' is set to {current_mode}, which it does not offer",
                        self.name
                    )));
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Weapon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (DV {}{}", self.name, self.damage, self.damage_type)?;
        if self.armor_penetration != 0 {
            write!(f, ", AP {}", self.armor_penetration)?;
        }
        match &self.class {
            WeaponClass::Melee { reach } if *reach > 0 => write!(f, ", reach {reach})"),
            WeaponClass::Melee { .. } => write!(f, ")"),
            WeaponClass::Ranged { current_mode, .. } => write!(f, ", {current_mode})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smg() -> Weapon {
        Weapon::ranged(
            "Ingram Smartgun",
            WeaponType::Smg,
            8,
            &[FireMode::SemiAuto, FireMode::BurstFire, FireMode::FullAuto],
        )
        .with_recoil_compensation(2)
        .with_magazine(32)
    }

    #[test]
    fn melee_has_no_fire_mode() {
        let knife = Weapon::melee("Combat Knife", WeaponType::Blade, 3)
            .with_reach(1)
            .with_ap(-1);
        assert!(knife.is_melee());
        assert_eq!(knife.fire_mode(), None);
        assert_eq!(knife.reach(), 1);
        assert_eq!(knife.recoil_compensation(), 0);
        assert!(knife.can_fire(FireMode::FullAuto));
        assert!(knife.validate().is_ok());
    }

    #[test]
    fn ranged_defaults_to_first_mode() {
        let gun = smg();
        assert_eq!(gun.category(), WeaponCategory::Ranged);
        assert_eq!(gun.fire_mode(), Some(FireMode::SemiAuto));
        assert_eq!(gun.recoil_compensation(), 2);
        assert_eq!(gun.reach(), 0);
    }

    #[test]
    fn fire_mode_switch_requires_support() {
        let gun = smg().with_fire_mode(FireMode::BurstFire);
        assert_eq!(gun.fire_mode(), Some(FireMode::BurstFire));
        let gun = gun.with_fire_mode(FireMode::SingleShot);
        assert_eq!(gun.fire_mode(), Some(FireMode::BurstFire));
    }

    #[test]
    fn ammunition_lifecycle() {
        let mut gun = smg().with_fire_mode(FireMode::FullAuto);
        gun.expend(30);
        assert!(gun.needs_reload());
        assert!(!gun.can_fire(FireMode::FullAuto));
        assert!(gun.can_fire(FireMode::SemiAuto));
        assert!(gun.reload());
        assert!(!gun.reload());
        assert!(gun.can_fire(FireMode::FullAuto));
    }

    #[test]
    fn weapon_without_magazine_never_runs_dry() {
        let mut bow = Weapon::ranged("Ranger X", WeaponType::Bow, 6, &[FireMode::SingleShot]);
        bow.expend(100);
        assert!(!bow.needs_reload());
        assert!(bow.can_fire(FireMode::SingleShot));
    }

    #[test]
    fn empty_fire_modes_is_configuration_error() {
        let broken = Weapon::ranged("Broken", WeaponType::HeavyPistol, 8, &[]);
        assert!(matches!(
            broken.validate(),
            Err(CombatError::Configuration(_))
        ));
    }

    #[test]
    fn display() {
        let gun = smg().with_ap(-1);
        assert_eq!(gun.to_string(), "Ingram Smartgun (DV 8P, AP -1, SA)");
        let baton = Weapon::melee("Stun Baton", WeaponType::Club, 9)
            .stun()
            .with_reach(1);
        assert_eq!(baton.to_string(), "Stun Baton (DV 9S, reach 1)");
    }

    #[test]
    fn deserialize_tagged_category() {
        let w: Weapon = serde_json::from_str(
            r#"{
                "name": "Ares Predator",
                "weapon_type": "heavy_pistol",
                "damage": 8,
                "armor_penetration": -1,
                "category": "ranged",
                "fire_modes": ["semi_auto"],
                "current_mode": "semi_auto",
                "magazine": {"loaded": 15, "capacity": 15}
            }"#,
        )
        .unwrap();
        assert_eq!(w.fire_mode(), Some(FireMode::SemiAuto));
        assert_eq!(w.armor_penetration, -1);

        let m: Weapon = serde_json::from_str(
            r#"{"name": "Katana", "weapon_type": "blade", "damage": 10, "category": "melee", "reach": 1}"#,
        )
        .unwrap();
        assert_eq!(m.reach(), 1);
    }
}
