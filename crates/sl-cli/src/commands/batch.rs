use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use sl_combat::{BatchConfig, MatchConfig, run_batch};

pub fn run(
    roster: &Path,
    map: Option<&Path>,
    matches: usize,
    seed: u64,
    distance: u32,
    parallel: bool,
) -> Result<(), String> {
    let setup = super::load_setup(roster, map)?;
    let match_config = MatchConfig::default().with_initial_distance(distance);
    let batch = BatchConfig::default()
        .with_matches(matches)
        .with_seed(seed)
        .with_parallel(parallel);

    let report = run_batch(&setup, &match_config, &batch).map_err(|e| e.to_string())?;

    println!(
        "  {} {} matches {}",
        "Batch".bold(),
        report.matches,
        format!(
            "(seed={seed}, distance={distance}m, {})",
            if parallel { "parallel" } else { "sequential" }
        )
        .dimmed()
    );
    println!(
        "  {} completed, {} failed, {} called at the round cap, {:.1} rounds on average",
        report.completed(),
        report.failed,
        report.capped,
        report.mean_rounds
    );
    println!();

    println!("  {}", "Outcomes".bold().underline());
    println!();
    let mut outcomes = Table::new();
    outcomes.set_content_arrangement(ContentArrangement::Dynamic);
    outcomes.set_header(vec!["Result", "Count", "Rate"]);
    for (faction, wins) in &report.wins {
        outcomes.add_row(vec![
            format!("{faction} wins"),
            wins.to_string(),
            format!("{:.1}%", report.win_rate(faction) * 100.0),
        ]);
    }
    outcomes.add_row(vec![
        "Draw".to_string(),
        report.draws.to_string(),
        format!("{:.1}%", report.draw_rate() * 100.0),
    ]);
    if report.failed > 0 {
        outcomes.add_row(vec![
            "Failed".red().to_string(),
            report.failed.to_string(),
            "--".to_string(),
        ]);
    }
    println!("{outcomes}");
    println!();

    println!("  {}", "Mean Damage Dealt".bold().underline());
    println!();
    let mut damage = Table::new();
    damage.set_content_arrangement(ContentArrangement::Dynamic);
    damage.set_header(vec!["Character", "Faction", "Per Match"]);
    for stat in &report.damage {
        damage.add_row(vec![
            stat.name.clone(),
            stat.faction.clone(),
            format!("{:.2}", stat.mean_damage_dealt),
        ]);
    }
    println!("{damage}");

    Ok(())
}
