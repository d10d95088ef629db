//! Pull and push command implementations
//!
//! Both load the sync state once, run the engine and save the state once.

use std::path::Path;

use colored::Colorize;

use bearsync_core::{SyncEngine, SyncOptions, VaultConfig};

use crate::error::Result;

use super::print_problems;

/// Run the pull command
///
/// Writes notes changed in Bear into the vault.
pub fn run_pull(vault: &Path) -> Result<()> {
    println!("{} Pulling changes from Bear...", "=>".blue().bold());

    let engine = SyncEngine::for_bear(VaultConfig::load_existing(vault)?)?;
    let mut state = engine.load_state()?;
    let report = engine.pull(&mut state)?;
    engine.save_state(&mut state)?;

    if report.changed() == 0 && report.deleted.is_empty() {
        println!("{} Vault is up to date.", "OK".green().bold());
    } else {
        println!(
            "{} {} created, {} updated, {} attachment(s) copied, {} untracked.",
            "OK".green().bold(),
            report.created,
            report.updated,
            report.attachments_copied,
            report.deleted.len()
        );
        for action in &report.actions {
            println!("   {} {}", "+".green(), action);
        }
    }

    print_problems(&report);
    Ok(())
}

/// Run the push command
///
/// Writes vault edits back into Bear. A dry run only lists what would be
/// pushed and leaves the sync state untouched.
pub fn run_push(vault: &Path, dry_run: bool) -> Result<()> {
    let mode = if dry_run { " (dry run)" } else { "" };
    println!("{} Pushing changes to Bear{}...", "=>".blue().bold(), mode);

    let engine = SyncEngine::for_bear(VaultConfig::load_existing(vault)?)?;
    let mut state = engine.load_state()?;
    let options = SyncOptions { dry_run };
    let report = engine.push(&mut state, &options)?;

    if !dry_run {
        engine.save_state(&mut state)?;
    }

    if report.actions.is_empty() {
        println!("{} Nothing to push.", "OK".green().bold());
    } else {
        if dry_run {
            println!("{} Would push {} note(s):", "DRY-RUN".yellow().bold(), report.actions.len());
        } else {
            println!("{} {} note(s) pushed:", "OK".green().bold(), report.pushed);
        }
        for action in &report.actions {
            println!("   {} {}", "+".green(), action);
        }
    }

    print_problems(&report);
    Ok(())
}
