//! Change classification
//!
//! Three-way comparison of the current source fingerprints, the current
//! destination fingerprints and the last reconciled pair in the
//! [`SyncStateStore`].

use crate::state::SyncStateStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// The category a note falls into for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Visible in the source but not tracked yet
    NewInSource,
    /// Only the source side moved since the last reconciliation
    SourceChanged,
    /// Only the destination file moved since the last reconciliation
    DestinationChanged,
    /// Both sides moved
    Conflict,
    /// Tracked but no longer visible in the source
    DeletedInSource,
}

/// Five disjoint, sorted lists of note identifiers.
///
/// Unchanged notes appear in none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub new_in_source: Vec<String>,
    pub source_changed: Vec<String>,
    pub destination_changed: Vec<String>,
    pub conflicts: Vec<String>,
    pub deleted_in_source: Vec<String>,
}

impl ChangeReport {
    /// True when nothing needs to happen in either direction
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Number of classified notes across all categories
    pub fn total(&self) -> usize {
        self.new_in_source.len()
            + self.source_changed.len()
            + self.destination_changed.len()
            + self.conflicts.len()
            + self.deleted_in_source.len()
    }

    /// Which category, if any, an identifier was placed in
    pub fn category_of(&self, id: &str) -> Option<ChangeKind> {
        let id = id.to_string();
        [
            (&self.new_in_source, ChangeKind::NewInSource),
            (&self.source_changed, ChangeKind::SourceChanged),
            (&self.destination_changed, ChangeKind::DestinationChanged),
            (&self.conflicts, ChangeKind::Conflict),
            (&self.deleted_in_source, ChangeKind::DeletedInSource),
        ]
        .into_iter()
        .find(|(ids, _)| ids.binary_search(&id).is_ok())
        .map(|(_, kind)| kind)
    }
}

/// Classify every note seen on either side.
///
/// `source_hashes` holds a fingerprint for every in-scope source note.
/// `destination_hashes` holds one for every tracked note whose file still
/// exists; a tracked note without one is treated as unchanged on the
/// destination side. The state is only read.
pub fn classify(
    source_hashes: &HashMap<String, String>,
    destination_hashes: &HashMap<String, String>,
    state: &SyncStateStore,
) -> ChangeReport {
    let mut report = ChangeReport::default();

    // BTreeSet iteration keeps every list sorted by identifier
    let seen: BTreeSet<&String> = source_hashes.keys().collect();

    for id in seen {
        let current_source = &source_hashes[id];
        let Some(stored) = state.get(id) else {
            report.new_in_source.push(id.clone());
            continue;
        };

        let current_destination = destination_hashes
            .get(id)
            .unwrap_or(&stored.destination_hash);

        let source_diff = *current_source != stored.source_hash;
        let destination_diff = *current_destination != stored.destination_hash;

        match (source_diff, destination_diff) {
            (true, true) => report.conflicts.push(id.clone()),
            (true, false) => report.source_changed.push(id.clone()),
            (false, true) => report.destination_changed.push(id.clone()),
            (false, false) => {}
        }
    }

    // all() is sorted by identifier
    report.deleted_in_source = state
        .all()
        .into_iter()
        .filter(|entry| !source_hashes.contains_key(&entry.id))
        .map(|entry| entry.id)
        .collect();

    report
}
