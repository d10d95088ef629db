//! bearsync CLI
//!
//! The command-line interface for syncing Bear notes with a Markdown vault.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            // No command provided - show help hint
            println!("{} Bear <-> Markdown vault sync", "bearsync".green().bold());
            println!();
            println!("Run {} for available commands.", "bearsync --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr; `--verbose` forces debug, otherwise `RUST_LOG` or warn.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(cmd: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Init {
            vault,
            bear_db,
            bear_files,
            exclude_tags,
        } => commands::run_init(&cwd.join(vault), bear_db, bear_files, exclude_tags),
        Commands::Status { vault, json } => {
            let vault = context::resolve_vault(vault.vault.as_deref(), &cwd)?;
            commands::run_status(&vault, json)
        }
        Commands::Pull { vault } => {
            let vault = context::resolve_vault(vault.vault.as_deref(), &cwd)?;
            commands::run_pull(&vault)
        }
        Commands::Push { vault, dry_run } => {
            let vault = context::resolve_vault(vault.vault.as_deref(), &cwd)?;
            commands::run_push(&vault, dry_run)
        }
    }
}
