pub mod batch;
pub mod fight;
pub mod init;

use std::fs;
use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use serde::de::DeserializeOwned;
use sl_combat::orchestrator::CombatantSummary;
use sl_combat::{GameMap, MatchSetup};

/// Read and parse a JSON file.
fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {what} '{}': {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid {what} '{}': {e}", path.display()))
}

/// Load a roster file and, optionally, a separate map file.
///
/// A map file overrides any map embedded in the roster.
fn load_setup(roster: &Path, map: Option<&Path>) -> Result<MatchSetup, String> {
    let mut setup: MatchSetup = read_json(roster, "roster")?;
    if let Some(path) = map {
        let map: GameMap = read_json(path, "map")?;
        setup.map = Some(map);
    }
    setup.validate().map_err(|e| e.to_string())?;
    tracing::debug!(
        "loaded {} characters in {} factions from {}",
        setup.characters.len(),
        setup.factions.len(),
        roster.display()
    );
    Ok(setup)
}

/// Final condition of every combatant as a table.
fn status_table(summaries: &[CombatantSummary]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Combatant", "Faction", "Condition", "Dealt", "Status"]);
    for s in summaries {
        let status = if !s.is_alive {
            "dead"
        } else if !s.is_conscious {
            "unconscious"
        } else {
            "standing"
        };
        table.add_row(vec![
            s.name.clone(),
            s.faction.clone(),
            s.condition.clone(),
            s.damage_dealt.to_string(),
            status.to_string(),
        ]);
    }
    table
}
