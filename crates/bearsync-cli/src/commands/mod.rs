//! Command implementations

mod init;
mod status;
mod sync;

pub use init::run_init;
pub use status::run_status;
pub use sync::{run_pull, run_push};

use bearsync_core::SyncReport;
use colored::{ColoredString, Colorize};

/// Entries shown per status section before truncating
pub const STATUS_LIMIT: usize = 20;
/// Per-note errors shown before truncating
pub const ERROR_LIMIT: usize = 10;

/// Print up to `limit` items, then an "... and N more" line.
pub(crate) fn print_limited<T: AsRef<str>>(items: &[T], limit: usize, marker: ColoredString) {
    for item in items.iter().take(limit) {
        println!("   {} {}", marker, item.as_ref());
    }
    if items.len() > limit {
        println!("   ... and {} more", items.len() - limit);
    }
}

/// Print the per-note errors and conflicts of a run.
pub(crate) fn print_problems(report: &SyncReport) {
    if !report.conflicts.is_empty() {
        println!();
        println!(
            "{} {} conflicting note(s) changed in both Bear and the vault were skipped:",
            "CONFLICT".yellow().bold(),
            report.conflicts.len()
        );
        print_limited(&report.conflicts, STATUS_LIMIT, "!".yellow());
    }

    if !report.errors.is_empty() {
        println!();
        println!(
            "{} {} note(s) failed:",
            "ERROR".red().bold(),
            report.errors.len()
        );
        let lines: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        print_limited(&lines, ERROR_LIMIT, "!".red());
    }
}
