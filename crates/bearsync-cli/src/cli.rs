//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bearsync - Keep Bear notes and a Markdown vault in sync
#[derive(Parser, Debug)]
#[command(name = "bearsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a vault and export every note into it
    ///
    /// Examples:
    ///   bearsync init ~/Notes
    ///   bearsync init ~/Notes --exclude-tag private --exclude-tag journal
    Init {
        /// Vault directory (created if missing)
        vault: PathBuf,

        /// Bear database file, if not in Bear's default location
        #[arg(long, value_name = "PATH")]
        bear_db: Option<PathBuf>,

        /// Bear attachment root, if not in Bear's default location
        #[arg(long, value_name = "PATH")]
        bear_files: Option<PathBuf>,

        /// Leave notes with this tag out of the vault (repeatable)
        #[arg(long = "exclude-tag", value_name = "TAG")]
        exclude_tags: Vec<String>,
    },

    /// Show what changed in Bear and in the vault since the last sync
    Status {
        #[command(flatten)]
        vault: VaultArg,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Bring changes made in Bear into the vault
    Pull {
        #[command(flatten)]
        vault: VaultArg,
    },

    /// Write vault edits back into Bear
    Push {
        #[command(flatten)]
        vault: VaultArg,

        /// Preview what would be pushed without touching Bear
        #[arg(long)]
        dry_run: bool,
    },
}

/// Vault selection shared by commands that operate on an existing vault
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct VaultArg {
    /// Vault directory (default: search upward from the current directory)
    #[arg(long, env = "BEARSYNC_VAULT", value_name = "PATH")]
    pub vault: Option<PathBuf>,
}
