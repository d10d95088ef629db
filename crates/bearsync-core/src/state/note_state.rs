//! Per-note reconciliation record

use bearsync_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// The last reconciled state of one note.
///
/// Records where the note lives in the vault and the fingerprints both sides
/// had when they last agreed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteState {
    /// Source-store identifier of the note
    pub id: String,
    /// Vault-relative path of the note document, forward slashes
    pub file_path: String,
    /// Fingerprint of the note body in the source store
    pub source_hash: String,
    /// Fingerprint of the document in the vault
    pub destination_hash: String,
}

impl NoteState {
    pub fn new(
        id: impl Into<String>,
        file_path: impl Into<String>,
        source_hash: impl Into<String>,
        destination_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_path: file_path.into(),
            source_hash: source_hash.into(),
            destination_hash: destination_hash.into(),
        }
    }

    /// The vault-relative path as a [`NormalizedPath`].
    pub fn path(&self) -> NormalizedPath {
        NormalizedPath::new(&self.file_path)
    }
}
