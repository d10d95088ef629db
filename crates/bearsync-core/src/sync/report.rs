//! Outcome types for reconciliation runs

use super::check::ChangeReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A failure attributed to a single note.
///
/// Recorded instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteError {
    pub id: String,
    pub title: String,
    pub reason: String,
}

impl NoteError {
    pub fn new(id: impl Into<String>, title: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.title, self.id, self.reason)
    }
}

/// Report from a pull, export or push run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Files written for notes seen for the first time
    pub created: usize,
    /// Existing files rewritten from the source
    pub updated: usize,
    /// Notes written back into the source
    pub pushed: usize,
    pub attachments_copied: usize,
    /// Identifiers changed on both sides, left untouched
    pub conflicts: Vec<String>,
    /// Identifiers no longer present in the source; their files are kept
    pub deleted: Vec<String>,
    /// Human-readable log of what was done (or would be done)
    pub actions: Vec<String>,
    pub errors: Vec<NoteError>,
}

impl SyncReport {
    /// Whether every note was processed without error
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of notes written in either direction
    pub fn changed(&self) -> usize {
        self.created + self.updated + self.pushed
    }
}

/// Options for push runs
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, report intended write-backs without performing them.
    /// Actions will be prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Classification of every note for a `status` run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub changes: ChangeReport,
    /// Display label per classified identifier: the note title, or the
    /// tracked file path for notes gone from the source
    pub labels: BTreeMap<String, String>,
    /// Notes in scope this run
    pub in_scope: usize,
    /// Notes skipped because of an excluded tag
    pub excluded: usize,
    /// Notes recorded in the sync state
    pub tracked: usize,
}

impl StatusReport {
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.labels.get(id).map(String::as_str).unwrap_or(id)
    }
}
