//! Vault configuration
//!
//! Stored at `<vault>/.bearsync/config.toml` and read through
//! [`ConfigStore`], so an unparseable file is an error while a missing one
//! yields defaults.

use crate::model::Note;
use crate::source::BearDatabase;
use crate::{Error, Result};
use bearsync_fs::{ConfigStore, NormalizedPath, VaultPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default pause between consecutive write-back requests
pub const DEFAULT_PUSH_DELAY_MS: u64 = 500;

fn default_push_delay_ms() -> u64 {
    DEFAULT_PUSH_DELAY_MS
}

/// Per-vault settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Root of the Markdown vault
    pub vault_path: PathBuf,

    /// Override for Bear's `database.sqlite`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bear_db_path: Option<PathBuf>,

    /// Override for Bear's attachment root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bear_files_path: Option<PathBuf>,

    /// Notes carrying any of these tags are left out of every run
    #[serde(default)]
    pub exclude_tags: Vec<String>,

    #[serde(default = "default_push_delay_ms")]
    pub push_delay_ms: u64,
}

impl VaultConfig {
    pub fn new(vault_path: impl Into<PathBuf>) -> Self {
        Self {
            vault_path: vault_path.into(),
            bear_db_path: None,
            bear_files_path: None,
            exclude_tags: Vec::new(),
            push_delay_ms: DEFAULT_PUSH_DELAY_MS,
        }
    }

    /// Path of the config file for a vault
    pub fn config_path(vault: &Path) -> NormalizedPath {
        NormalizedPath::new(vault).join(VaultPath::ConfigFile.as_str())
    }

    /// Path of the sync state document for a vault
    pub fn state_path(vault: &Path) -> NormalizedPath {
        NormalizedPath::new(vault).join(VaultPath::StateFile.as_str())
    }

    /// Load the config of a vault.
    ///
    /// A missing file yields defaults rooted at `vault`. The stored
    /// `vault_path` is always replaced by `vault`, so a moved vault keeps
    /// working.
    pub fn load(vault: &Path) -> Result<Self> {
        let path = Self::config_path(vault);
        if !path.exists() {
            tracing::debug!(path = %path, "No vault config, using defaults");
            return Ok(Self::new(vault));
        }

        let mut config: Self = ConfigStore::new().load(&path)?;
        config.vault_path = vault.to_path_buf();
        Ok(config)
    }

    /// Load the config of a vault, failing if it was never initialized.
    pub fn load_existing(vault: &Path) -> Result<Self> {
        let path = Self::config_path(vault);
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_native(),
            });
        }
        Self::load(vault)
    }

    /// Write the config under `.bearsync/`, creating the directory.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path(&self.vault_path);
        ConfigStore::new().save(&path, self)?;
        Ok(())
    }

    pub fn vault_root(&self) -> NormalizedPath {
        NormalizedPath::new(&self.vault_path)
    }

    /// Whether a note is out of scope because of its tags
    pub fn is_excluded(&self, note: &Note) -> bool {
        note.has_any_tag(&self.exclude_tags)
    }

    pub fn push_delay(&self) -> Duration {
        Duration::from_millis(self.push_delay_ms)
    }

    /// The Bear database this vault syncs against
    pub fn bear_database(&self) -> Result<BearDatabase> {
        BearDatabase::locate(self.bear_db_path.as_deref(), self.bear_files_path.as_deref())
    }
}
