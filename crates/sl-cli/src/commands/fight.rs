use std::path::Path;

use colored::Colorize;

use sl_combat::{ActionKind, AttackOutcome, MatchConfig, MatchOutcome, RoundResult, run_match};

pub fn run(
    roster: &Path,
    map: Option<&Path>,
    seed: u64,
    distance: u32,
    verbose: bool,
) -> Result<(), String> {
    let setup = super::load_setup(roster, map)?;
    let config = MatchConfig::default()
        .with_seed(seed)
        .with_initial_distance(distance);
    let result = run_match(&setup, &config).map_err(|e| e.to_string())?;

    let factions: Vec<&str> = setup.factions.iter().map(|f| f.name.as_str()).collect();
    println!(
        "  {} {} {}",
        "Match".bold(),
        factions.join(" vs "),
        format!("(seed={seed}, distance={distance}m)").dimmed()
    );
    println!();

    let mut round = 0;
    for action in &result.actions {
        if action.round != round {
            round = action.round;
            println!("  {}", format!("Round {round}").bold().underline());
        }
        print_action(action, verbose);
    }
    println!();

    let verdict = match &result.outcome {
        MatchOutcome::Victory { faction } => format!("{faction} wins").green().bold(),
        MatchOutcome::Draw => "Draw".yellow().bold(),
    };
    let cap = if result.hit_round_cap {
        " at the round cap"
    } else {
        ""
    };
    println!(
        "  {verdict} after {} round{}{cap}",
        result.rounds,
        if result.rounds == 1 { "" } else { "s" }
    );
    println!();

    println!("  {}", "Final Status".bold().underline());
    println!();
    println!("{}", super::status_table(&result.summaries));

    Ok(())
}

fn print_action(action: &RoundResult, verbose: bool) {
    let phase = format!("[{:>3}]", action.initiative_phase).dimmed();
    let headline = action.narration.first().map(String::as_str).unwrap_or("");

    if verbose {
        println!("  {phase} {}", colorize(action, headline));
        for line in action.narration.iter().skip(1) {
            println!("        {}", colorize(action, line));
        }
        return;
    }

    let tail = match action.outcome {
        Some(outcome) => format!(" {}", outcome_label(outcome)),
        None => String::new(),
    };
    println!("  {phase} {}{tail}", colorize(action, headline));
    for change in &action.status_changes {
        println!("        {}", change.to_string().red().bold());
    }
}

fn outcome_label(outcome: AttackOutcome) -> colored::ColoredString {
    let text = format!("-> {outcome}");
    match outcome {
        AttackOutcome::Hit { .. } => text.red(),
        AttackOutcome::Miss | AttackOutcome::Resisted => text.normal(),
        AttackOutcome::Glitch | AttackOutcome::CriticalGlitch { .. } => text.yellow(),
    }
}

fn colorize(action: &RoundResult, line: &str) -> colored::ColoredString {
    match action.action {
        ActionKind::Attack if line.contains(" moves ") => line.blue(),
        ActionKind::Reload => line.cyan(),
        ActionKind::Attack if line.contains(" is killed") => line.red().bold(),
        ActionKind::Attack if line.contains(" takes ") => line.red(),
        ActionKind::Attack if action.glitched() => line.yellow(),
        ActionKind::Attack => line.normal(),
    }
}
