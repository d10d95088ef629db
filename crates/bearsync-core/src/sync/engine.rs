//! SyncEngine implementation
//!
//! The SyncEngine reconciles the source store with the vault. Every
//! operation takes a single snapshot of the source, classifies it against
//! the caller's [`SyncStateStore`] and applies one-directional updates.
//! Per-note failures are collected into the returned report; only setup
//! failures (unreadable source, unreadable vault) abort a run.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::thread;

use bearsync_fs::{NormalizedPath, fingerprint, fingerprint_file, io};

use crate::attachments::{AttachmentMap, copy_attachments};
use crate::config::VaultConfig;
use crate::convert::{FrontMatter, extract_identifier, to_destination_format, to_source_format};
use crate::model::Note;
use crate::naming::{PathRegistry, note_folder};
use crate::source::NoteSource;
use crate::state::{NoteState, SyncStateStore};
use crate::writeback::{BearCallback, WriteBack};
use crate::{Error, Result};

use super::check::{ChangeReport, classify};
use super::report::{NoteError, StatusReport, SyncOptions, SyncReport};

/// One snapshot of both sides of the sync.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    /// In-scope source notes keyed by identifier
    pub notes: BTreeMap<String, Note>,
    /// Fingerprint of every in-scope note body
    pub source_hashes: HashMap<String, String>,
    /// Fingerprint of every tracked file that still exists
    pub destination_hashes: HashMap<String, String>,
    /// Source notes left out because of an excluded tag
    pub excluded: BTreeSet<String>,
}

impl Observation {
    /// Classify this snapshot against `state`.
    ///
    /// Excluded notes still exist in the source, so their state entries are
    /// never reported as deleted.
    pub fn classify(&self, state: &SyncStateStore) -> ChangeReport {
        let mut changes = classify(&self.source_hashes, &self.destination_hashes, state);
        changes
            .deleted_in_source
            .retain(|id| !self.excluded.contains(id));
        changes
    }

    fn title_of(&self, id: &str) -> String {
        self.notes
            .get(id)
            .map(|n| n.title.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// Result of writing one note into the vault
struct Written {
    source_hash: String,
    destination_hash: String,
    attachments_copied: usize,
}

/// Engine reconciling a source store with a vault
///
/// The engine provides four operations:
/// - **status**: classify every note without changing anything
/// - **export_all**: write every new or source-changed note into the vault
/// - **pull**: the same, keeping each tracked note's historical file path
/// - **push**: write vault edits back into the source and verify them
pub struct SyncEngine {
    config: VaultConfig,
    source: Box<dyn NoteSource>,
    write_back: Box<dyn WriteBack>,
}

impl SyncEngine {
    pub fn new(
        config: VaultConfig,
        source: Box<dyn NoteSource>,
        write_back: Box<dyn WriteBack>,
    ) -> Self {
        Self {
            config,
            source,
            write_back,
        }
    }

    /// Engine wired to the Bear database and callback URL scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if the Bear database location cannot be resolved.
    pub fn for_bear(config: VaultConfig) -> Result<Self> {
        let source = config.bear_database()?;
        Ok(Self::new(
            config,
            Box::new(source),
            Box::new(BearCallback::new()),
        ))
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    fn vault_file(&self, relative: &str) -> NormalizedPath {
        self.config.vault_root().join(relative)
    }

    /// Load the sync state of this vault.
    ///
    /// # Errors
    ///
    /// Returns an error if the state document exists but is corrupt.
    pub fn load_state(&self) -> Result<SyncStateStore> {
        SyncStateStore::load(VaultConfig::state_path(&self.config.vault_path))
    }

    /// Persist the sync state at the end of a run.
    pub fn save_state(&self, state: &mut SyncStateStore) -> Result<()> {
        state.save()
    }

    /// Take one snapshot of the source and fingerprint both sides.
    ///
    /// # Errors
    ///
    /// Returns an error if the source store cannot be read.
    pub fn observe(&self, state: &SyncStateStore) -> Result<Observation> {
        let mut observation = Observation::default();

        for note in self.source.fetch_all()? {
            if self.config.is_excluded(&note) {
                tracing::debug!(id = %note.id, "Note excluded by tag");
                observation.excluded.insert(note.id);
                continue;
            }
            observation
                .source_hashes
                .insert(note.id.clone(), fingerprint(&note.text));
            observation.notes.insert(note.id.clone(), note);
        }

        for entry in state.all() {
            let file = self.vault_file(&entry.file_path);
            if !file.is_file() {
                tracing::debug!(id = %entry.id, path = %entry.file_path, "Tracked file missing");
                continue;
            }
            match fingerprint_file(&file.to_native()) {
                Ok(hash) => {
                    observation.destination_hashes.insert(entry.id, hash);
                }
                Err(e) => {
                    tracing::warn!(path = %file, error = %e, "Could not fingerprint tracked file");
                }
            }
        }

        tracing::debug!(
            notes = observation.notes.len(),
            tracked = state.len(),
            excluded = observation.excluded.len(),
            "Observed source and vault"
        );
        Ok(observation)
    }

    /// Classify every note without changing anything.
    pub fn status(&self, state: &SyncStateStore) -> Result<StatusReport> {
        let observation = self.observe(state)?;
        let changes = observation.classify(state);

        let mut labels = BTreeMap::new();
        for id in changes
            .new_in_source
            .iter()
            .chain(&changes.source_changed)
            .chain(&changes.destination_changed)
            .chain(&changes.conflicts)
        {
            labels.insert(id.clone(), observation.title_of(id));
        }
        for id in &changes.deleted_in_source {
            if let Some(entry) = state.get(id) {
                labels.insert(id.clone(), entry.file_path.clone());
            }
        }

        Ok(StatusReport {
            changes,
            labels,
            in_scope: observation.notes.len(),
            excluded: observation.excluded.len(),
            tracked: state.len(),
        })
    }

    /// Write every new or source-changed note into the vault.
    ///
    /// Used for the first run of a vault; on an already populated state it
    /// behaves exactly like [`pull`](Self::pull).
    pub fn export_all(&self, state: &mut SyncStateStore) -> Result<SyncReport> {
        tracing::info!(vault = %self.config.vault_path.display(), "Exporting notes");
        self.apply_source(state)
    }

    /// Bring source-side changes into the vault.
    ///
    /// Tracked notes are rewritten at their recorded path. Conflicts are
    /// reported and left alone. Notes gone from the source lose their state
    /// entry but keep their file.
    pub fn pull(&self, state: &mut SyncStateStore) -> Result<SyncReport> {
        tracing::info!(vault = %self.config.vault_path.display(), "Pulling notes");
        self.apply_source(state)
    }

    fn apply_source(&self, state: &mut SyncStateStore) -> Result<SyncReport> {
        let observation = self.observe(state)?;
        let changes = observation.classify(state);
        let mut report = SyncReport::default();

        // Tracked notes keep their files; new names must route around them
        let mut registry = PathRegistry::new();
        for entry in state.all() {
            registry.claim(&entry.path());
        }

        for id in &changes.new_in_source {
            let Some(note) = observation.notes.get(id) else {
                continue;
            };
            let path = self.assign_path(&mut registry, note);
            match self.write_note(note, &path) {
                Ok(written) => {
                    state.set(
                        id,
                        path.as_str(),
                        &written.source_hash,
                        &written.destination_hash,
                    );
                    report.created += 1;
                    report.attachments_copied += written.attachments_copied;
                    report.actions.push(format!("Created {}", path));
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Failed to export note");
                    report.errors.push(NoteError::new(id, &note.title, e));
                }
            }
        }

        for id in &changes.source_changed {
            let (Some(note), Some(entry)) = (observation.notes.get(id), state.get(id).cloned())
            else {
                continue;
            };
            let path = entry.path();
            match self.write_note(note, &path) {
                Ok(written) => {
                    state.set(
                        id,
                        path.as_str(),
                        &written.source_hash,
                        &written.destination_hash,
                    );
                    report.updated += 1;
                    report.attachments_copied += written.attachments_copied;
                    report.actions.push(format!("Updated {}", path));
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Failed to update note");
                    report.errors.push(NoteError::new(id, &note.title, e));
                }
            }
        }

        for id in &changes.conflicts {
            tracing::warn!(id = %id, "Conflict: changed in Bear and in the vault, skipping");
            report.conflicts.push(id.clone());
        }

        for id in &changes.deleted_in_source {
            if let Some(entry) = state.remove(id) {
                tracing::info!(id = %id, path = %entry.file_path, "Note gone from Bear, untracked");
                report
                    .actions
                    .push(format!("Untracked {} (file kept)", entry.file_path));
                report.deleted.push(id.clone());
            }
        }

        tracing::info!(
            created = report.created,
            updated = report.updated,
            conflicts = report.conflicts.len(),
            errors = report.errors.len(),
            "Pull finished"
        );
        Ok(report)
    }

    /// Pick a fresh vault path for a note that has never been exported.
    ///
    /// Skips names already issued this run and files already on disk, so
    /// an untracked file is never overwritten.
    fn assign_path(&self, registry: &mut PathRegistry, note: &Note) -> NormalizedPath {
        let folder = note_folder(note);
        loop {
            let candidate = registry.issue(&folder, &note.title);
            if !self.vault_file(candidate.as_str()).exists() {
                return candidate;
            }
            tracing::debug!(path = %candidate, "Path exists on disk, trying next name");
        }
    }

    /// Convert a note and write it with its attachments at `path`.
    fn write_note(&self, note: &Note, path: &NormalizedPath) -> Result<Written> {
        let map = AttachmentMap::build(&note.attachments);
        let document = to_destination_format(&note.text, &FrontMatter::from_note(note), &map);

        let file = self.vault_file(path.as_str());
        io::write_text(&file, &document)?;

        let folder = file
            .parent()
            .unwrap_or_else(|| self.config.vault_root());
        let attachments_copied = copy_attachments(&note.attachments, &folder)?;

        tracing::debug!(id = %note.id, path = %path, "Wrote note");
        Ok(Written {
            source_hash: fingerprint(&note.text),
            destination_hash: fingerprint(&document),
            attachments_copied,
        })
    }

    /// Write vault edits back into the source.
    ///
    /// Each write-back is followed by `push_delay` and a re-read of the note;
    /// state is only updated once the change is visible in the source.
    /// Conflicts are always skipped.
    pub fn push(&self, state: &mut SyncStateStore, options: &SyncOptions) -> Result<SyncReport> {
        tracing::info!(
            vault = %self.config.vault_path.display(),
            dry_run = options.dry_run,
            "Pushing notes"
        );
        let observation = self.observe(state)?;
        let changes = observation.classify(state);
        let mut report = SyncReport::default();

        for id in &changes.conflicts {
            tracing::warn!(id = %id, "Conflict: changed in Bear and in the vault, skipping");
            report.conflicts.push(id.clone());
        }

        for id in &changes.destination_changed {
            let (Some(note), Some(entry)) = (observation.notes.get(id), state.get(id).cloned())
            else {
                continue;
            };

            match self.push_note(note, &entry, &observation, options) {
                Ok(Some((source_hash, destination_hash))) => {
                    state.set(id, &entry.file_path, &source_hash, &destination_hash);
                    report.pushed += 1;
                    report.actions.push(format!("Pushed: {}", note.title));
                }
                Ok(None) => {
                    report
                        .actions
                        .push(format!("[dry-run] Would push: {}", note.title));
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Failed to push note");
                    report.errors.push(NoteError::new(id, &note.title, e));
                }
            }
        }

        tracing::info!(
            pushed = report.pushed,
            conflicts = report.conflicts.len(),
            errors = report.errors.len(),
            "Push finished"
        );
        Ok(report)
    }

    /// Push one note, returning the new `(source, destination)` hash pair,
    /// or `None` for a dry run.
    fn push_note(
        &self,
        note: &Note,
        entry: &NoteState,
        observation: &Observation,
        options: &SyncOptions,
    ) -> Result<Option<(String, String)>> {
        let file = self.vault_file(&entry.file_path);
        let document = io::read_text(&file)?;

        if let Some(found) = extract_identifier(&document)
            && found != note.id
        {
            return Err(Error::IdentifierMismatch {
                file: entry.file_path.clone(),
                expected: note.id.clone(),
                found,
            });
        }

        let inverse = AttachmentMap::build(&note.attachments).inverse();
        let body = to_source_format(&document, &inverse);

        if options.dry_run {
            tracing::debug!(id = %note.id, "Dry run, not writing back");
            return Ok(None);
        }

        let hash_before = observation
            .source_hashes
            .get(&note.id)
            .cloned()
            .unwrap_or_else(|| fingerprint(&note.text));

        self.write_back.request_overwrite(&note.id, &body)?;

        let delay = self.config.push_delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        let fresh = self
            .source
            .fetch_by_id(&note.id)?
            .ok_or_else(|| Error::VerificationFailed {
                id: note.id.clone(),
                reason: "note not found after write-back".to_string(),
            })?;
        let fresh_hash = fingerprint(&fresh.text);

        // An unchanged source is only acceptable if nothing needed to change
        if fresh_hash == hash_before && fingerprint(&body) != hash_before {
            return Err(Error::VerificationFailed {
                id: note.id.clone(),
                reason: "source content unchanged after write-back".to_string(),
            });
        }

        tracing::debug!(id = %note.id, "Write-back verified");
        Ok(Some((fresh_hash, fingerprint(&document))))
    }
}
