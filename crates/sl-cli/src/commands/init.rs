use std::fs;
use std::path::Path;

use sl_combat::{
    Attributes, Character, FireMode, MatchSetup, Metatype, Skills, Weapon, WeaponType,
};

/// Two runners against two gangers: one blade and one gun on each side.
fn sample() -> MatchSetup {
    let samurai = Character::new(1, "Razor")
        .with_metatype(Metatype::Ork)
        .with_attributes(Attributes {
            body: 5,
            agility: 5,
            reaction: 5,
            strength: 5,
            ..Attributes::default()
        })
        .with_skills(Skills {
            close_combat: 5,
            running: 2,
            armor: 4,
            ..Skills::default()
        })
        .with_weapon(
            Weapon::melee("Katana", WeaponType::Blade, 8)
                .with_reach(1)
                .with_ap(-3)
                .with_accuracy(7),
        )
        .with_initiative_dice(2);
    let gunner = Character::new(2, "Slate")
        .with_metatype(Metatype::Elf)
        .with_attributes(Attributes {
            agility: 6,
            intuition: 4,
            ..Attributes::default()
        })
        .with_skills(Skills {
            firearms: 6,
            armor: 3,
            ..Skills::default()
        })
        .with_weapon(
            Weapon::ranged(
                "Ares Predator",
                WeaponType::HeavyPistol,
                8,
                &[FireMode::SemiAuto],
            )
            .with_ap(-1)
            .with_accuracy(5)
            .with_magazine(15),
        );
    let bruiser = Character::new(3, "Tusk")
        .with_metatype(Metatype::Troll)
        .with_attributes(Attributes {
            body: 7,
            strength: 7,
            ..Attributes::default()
        })
        .with_skills(Skills {
            close_combat: 4,
            armor: 2,
            ..Skills::default()
        })
        .with_weapon(Weapon::melee("Stun Baton", WeaponType::Club, 9).stun().with_reach(1));
    let sprayer = Character::new(4, "Jinx")
        .with_skills(Skills {
            firearms: 4,
            close_combat: 2,
            armor: 2,
            ..Skills::default()
        })
        .with_weapon(
            Weapon::ranged(
                "Ceska Black Scorpion",
                WeaponType::MachinePistol,
                6,
                &[FireMode::SemiAuto, FireMode::BurstFire],
            )
            .with_fire_mode(FireMode::BurstFire)
            .with_recoil_compensation(1)
            .with_magazine(35),
        )
        .with_weapon(Weapon::melee("Knife", WeaponType::Blade, 3));

    MatchSetup::new(vec![samurai, gunner, bruiser, sprayer])
        .with_faction("Runners", [1, 2])
        .with_faction("Halloweeners", [3, 4])
        .with_modifier(4, -1)
        .with_running(3)
}

pub fn run(file: &Path) -> Result<(), String> {
    if file.exists() {
        return Err(format!("'{}' already exists", file.display()));
    }

    let json = serde_json::to_string_pretty(&sample())
        .map_err(|e| format!("cannot serialize roster: {e}"))?;
    fs::write(file, json).map_err(|e| format!("cannot write {}: {e}", file.display()))?;

    println!("Created roster {}", file.display());
    println!();
    println!("Try:");
    println!("  sl match -r {}", file.display());
    println!("  sl batch -r {} -n 500", file.display());

    Ok(())
}
