//! Well-known names inside a vault.

use std::path::Path;

/// Fixed files and folders bearsync creates or relies on inside a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultPath {
    /// The `.bearsync/config.toml` file
    ConfigFile,
    /// The `.bearsync/state.toml` file
    StateFile,
    /// Catch-all folder for notes without tags
    UntaggedDir,
    /// Per-folder directory holding copied attachments
    AttachmentsDir,
}

impl VaultPath {
    /// Get the string representation of the path, relative to the vault root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigFile => ".bearsync/config.toml",
            Self::StateFile => ".bearsync/state.toml",
            Self::UntaggedDir => "_untagged",
            Self::AttachmentsDir => "_attachments",
        }
    }
}

impl AsRef<Path> for VaultPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for VaultPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for VaultPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
