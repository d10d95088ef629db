//! Sync State Store
//!
//! The store is the persistent record of the last known good state of every
//! exported note. It is loaded once at the start of a command, mutated in
//! memory while notes are reconciled and saved once at the end of the run.
//! The TOML document is sorted by file path so unchanged state re-saves to a
//! byte-identical file.

mod note_state;

pub use note_state::NoteState;

use crate::{Error, Result};
use bearsync_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current state document format version
const STATE_VERSION: &str = "1";

/// On-disk shape of the state document
#[derive(Debug, Serialize, Deserialize)]
struct StateDocument {
    version: String,
    #[serde(default)]
    notes: Vec<NoteState>,
}

/// In-memory map of note identifier to [`NoteState`], bound to one file.
#[derive(Debug, Clone)]
pub struct SyncStateStore {
    path: NormalizedPath,
    notes: HashMap<String, NoteState>,
    dirty: bool,
}

impl SyncStateStore {
    /// Create an empty store that will be saved to `path`.
    pub fn empty(path: NormalizedPath) -> Self {
        Self {
            path,
            notes: HashMap::new(),
            dirty: false,
        }
    }

    /// Load the store from `path`.
    ///
    /// A missing file yields an empty store. A file that exists but cannot be
    /// parsed, or that lists an identifier twice, is a fatal
    /// [`Error::CorruptState`]: proceeding with empty state would reclassify
    /// every note as new.
    pub fn load(path: NormalizedPath) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path, "No sync state yet, starting empty");
            return Ok(Self::empty(path));
        }

        let content = io::read_text(&path)?;

        let document: StateDocument = toml::from_str(&content).map_err(|e| Error::CorruptState {
            path: path.to_native(),
            message: e.to_string(),
        })?;

        if document.version != STATE_VERSION {
            return Err(Error::CorruptState {
                path: path.to_native(),
                message: format!("unsupported state version {}", document.version),
            });
        }

        let mut notes = HashMap::with_capacity(document.notes.len());
        for state in document.notes {
            if notes.contains_key(&state.id) {
                return Err(Error::CorruptState {
                    path: path.to_native(),
                    message: format!("note {} is listed more than once", state.id),
                });
            }
            notes.insert(state.id.clone(), state);
        }

        tracing::debug!(path = %path, notes = notes.len(), "Loaded sync state");
        Ok(Self {
            path,
            notes,
            dirty: false,
        })
    }

    /// Serialize the store, sorted by file path.
    pub fn to_document_string(&self) -> Result<String> {
        let mut notes: Vec<NoteState> = self.notes.values().cloned().collect();
        notes.sort_by(|a, b| a.file_path.cmp(&b.file_path).then_with(|| a.id.cmp(&b.id)));

        let document = StateDocument {
            version: STATE_VERSION.to_string(),
            notes,
        };
        Ok(toml::to_string_pretty(&document)?)
    }

    /// Save the store through [`io::write_text`], which replaces the file
    /// atomically under an exclusive lock.
    pub fn save(&mut self) -> Result<()> {
        let content = self.to_document_string()?;
        io::write_text(&self.path, &content)?;

        self.dirty = false;
        tracing::debug!(path = %self.path, notes = self.notes.len(), "Saved sync state");
        Ok(())
    }

    /// Path of the persisted state document.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Stored state for a note.
    pub fn get(&self, id: &str) -> Option<&NoteState> {
        self.notes.get(id)
    }

    /// Record or update the state of a note.
    pub fn set(
        &mut self,
        id: &str,
        file_path: &str,
        source_hash: &str,
        destination_hash: &str,
    ) {
        let state = NoteState::new(id, file_path, source_hash, destination_hash);
        if self.notes.get(id) != Some(&state) {
            self.notes.insert(id.to_string(), state);
            self.dirty = true;
        }
    }

    /// Stop tracking a note, returning its last state.
    pub fn remove(&mut self, id: &str) -> Option<NoteState> {
        let removed = self.notes.remove(id);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Snapshot of every tracked note, sorted by identifier.
    pub fn all(&self) -> Vec<NoteState> {
        let mut notes: Vec<NoteState> = self.notes.values().cloned().collect();
        notes.sort_by(|a, b| a.id.cmp(&b.id));
        notes
    }

    /// Whether a note is tracked.
    pub fn contains(&self, id: &str) -> bool {
        self.notes.contains_key(id)
    }

    /// Number of tracked notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether no note is tracked.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether the store changed since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
