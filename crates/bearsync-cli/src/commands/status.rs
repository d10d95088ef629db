//! Status command implementation

use std::path::Path;

use colored::{ColoredString, Colorize};

use bearsync_core::{StatusReport, SyncEngine, VaultConfig};

use crate::error::Result;

use super::{STATUS_LIMIT, print_limited};

/// Run the status command
pub fn run_status(vault: &Path, json: bool) -> Result<()> {
    let engine = SyncEngine::for_bear(VaultConfig::load_existing(vault)?)?;
    let state = engine.load_state()?;
    let status = engine.status(&state)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Vault Status".bold());
    println!();
    println!("{}:     {}", "Vault".dimmed(), vault.display());
    println!(
        "{}:     {} in scope, {} tracked, {} excluded",
        "Notes".dimmed(),
        status.in_scope,
        status.tracked,
        status.excluded
    );
    println!();

    let changes = &status.changes;
    if changes.is_clean() {
        println!("{} Everything is in sync.", "OK".green().bold());
        return Ok(());
    }

    section(&status, "New in Bear", &changes.new_in_source, "+".green());
    section(&status, "Changed in Bear", &changes.source_changed, "~".blue());
    section(&status, "Changed in vault", &changes.destination_changed, "~".cyan());
    section(&status, "Conflicts", &changes.conflicts, "!".red());
    section(&status, "Deleted from Bear", &changes.deleted_in_source, "-".yellow());

    if !changes.new_in_source.is_empty() || !changes.source_changed.is_empty() {
        println!("Run {} to update the vault.", "bearsync pull".cyan());
    }
    if !changes.destination_changed.is_empty() {
        println!("Run {} to update Bear.", "bearsync push".cyan());
    }
    if !changes.conflicts.is_empty() {
        println!("Conflicts must be resolved by hand on one side.");
    }
    Ok(())
}

fn section(status: &StatusReport, heading: &str, ids: &[String], marker: ColoredString) {
    if ids.is_empty() {
        return;
    }
    println!("{} ({}):", heading.bold(), ids.len());
    let labels: Vec<&str> = ids.iter().map(|id| status.label(id)).collect();
    print_limited(&labels, STATUS_LIMIT, marker);
    println!();
}
