//! [`TestVault`] temporary vault for engine scenarios.

use crate::writeback::{ScriptedWriteBack, WriteBackMode};
use bearsync_core::{MemorySource, Note, SyncEngine, SyncStateStore, VaultConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary vault wired to an in-memory source and a scripted write-back.
///
/// The config has no push delay so push scenarios run instantly.
///
/// # Example
///
/// ```rust
/// use bearsync_test_utils::{NoteBuilder, TestVault};
///
/// let vault = TestVault::with_notes(vec![NoteBuilder::new("A", "Alpha").build()]);
/// let engine = vault.engine();
/// let mut state = engine.load_state().unwrap();
/// engine.export_all(&mut state).unwrap();
/// vault.assert_file_exists("_untagged/Alpha.md");
/// ```
pub struct TestVault {
    temp_dir: TempDir,
    /// Shared with every engine built by this vault
    pub source: MemorySource,
    /// Shared call log with every engine built by this vault
    pub write_back: ScriptedWriteBack,
    pub config: VaultConfig,
}

impl TestVault {
    /// An empty vault whose write-back applies bodies to the source.
    pub fn new() -> Self {
        Self::with_notes(Vec::new())
    }

    pub fn with_notes(notes: Vec<Note>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let source = MemorySource::new(notes);
        let write_back = ScriptedWriteBack::applying(&source);
        let mut config = VaultConfig::new(temp_dir.path());
        config.push_delay_ms = 0;

        Self {
            temp_dir,
            source,
            write_back,
            config,
        }
    }

    /// Replace the write-back behaviour for engines built afterwards.
    pub fn set_write_back(&mut self, mode: WriteBackMode) {
        self.write_back = ScriptedWriteBack::new(mode);
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Engine over this vault's source, write-back and config.
    pub fn engine(&self) -> SyncEngine {
        SyncEngine::new(
            self.config.clone(),
            Box::new(self.source.clone()),
            Box::new(self.write_back.clone()),
        )
    }

    /// Load state through a fresh engine, as a new CLI run would.
    pub fn load_state(&self) -> SyncStateStore {
        self.engine().load_state().unwrap()
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Replace the first occurrence of `from` in a vault file.
    pub fn edit(&self, relative: &str, from: &str, to: &str) {
        let content = self.read(relative);
        assert!(
            content.contains(from),
            "{relative} does not contain {from:?}"
        );
        self.write(relative, &content.replacen(from, to, 1));
    }

    pub fn assert_file_exists(&self, relative: &str) {
        assert!(
            self.path(relative).is_file(),
            "expected {relative} to exist in the vault"
        );
    }

    pub fn assert_file_not_exists(&self, relative: &str) {
        assert!(
            !self.path(relative).exists(),
            "expected {relative} not to exist in the vault"
        );
    }
}

impl Default for TestVault {
    fn default() -> Self {
        Self::new()
    }
}
