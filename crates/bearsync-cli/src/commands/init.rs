//! Init command implementation

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;

use bearsync_core::{SyncEngine, VaultConfig};

use crate::error::{CliError, Result};

use super::print_problems;

/// Run the init command
///
/// Creates the vault directory and its config, then exports every note.
pub fn run_init(
    vault: &Path,
    bear_db: Option<PathBuf>,
    bear_files: Option<PathBuf>,
    exclude_tags: Vec<String>,
) -> Result<()> {
    println!(
        "{} Initializing vault in {}...",
        "=>".blue().bold(),
        vault.display().to_string().cyan()
    );

    fs::create_dir_all(vault)?;
    let vault = dunce::canonicalize(vault)?;

    if VaultConfig::config_path(&vault).exists() {
        return Err(CliError::user(format!(
            "{} is already a bearsync vault (use `bearsync pull` to update it)",
            vault.display()
        )));
    }

    if !exclude_tags.is_empty() {
        println!("   Excluding tags: {}", exclude_tags.join(", ").yellow());
    }

    let mut config = VaultConfig::new(&vault);
    config.bear_db_path = bear_db;
    config.bear_files_path = bear_files;
    config.exclude_tags = exclude_tags;

    let engine = SyncEngine::for_bear(config)?;
    let mut state = engine.load_state()?;
    let report = engine.export_all(&mut state)?;

    engine.config().save()?;
    engine.save_state(&mut state)?;

    println!(
        "{} Vault initialized: {} note(s) exported, {} attachment(s) copied.",
        "OK".green().bold(),
        report.created,
        report.attachments_copied
    );
    print_problems(&report);
    Ok(())
}
