//! Forward-slash paths
//!
//! Vault-relative paths are persisted in the sync state, so they must read
//! the same on every platform. [`NormalizedPath`] keeps `/` as the only
//! separator and converts to a native path only when touching the disk.

use std::fmt;
use std::path::{Path, PathBuf};

/// A path whose separators are always `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    slashed: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            slashed: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.slashed
    }

    /// Native path for filesystem calls.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.slashed)
    }

    /// Append a segment, which may itself contain separators.
    ///
    /// An empty base yields the segment unchanged.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let base = self.slashed.trim_end_matches('/');
        let slashed = match (base.is_empty(), self.slashed.starts_with('/')) {
            (true, true) => format!("/{segment}"),
            (true, false) => segment,
            (false, _) => format!("{base}/{segment}"),
        };
        Self { slashed }
    }

    /// Everything before the last segment, `None` for a single segment.
    pub fn parent(&self) -> Option<Self> {
        let (head, _) = self.trimmed().rsplit_once('/')?;
        let slashed = if head.is_empty() { "/" } else { head };
        Some(Self {
            slashed: slashed.to_string(),
        })
    }

    /// Last segment, if non-empty.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.trimmed();
        let name = trimmed.rsplit_once('/').map_or(trimmed, |(_, name)| name);
        (!name.is_empty()).then_some(name)
    }

    /// File name without its extension. Dotfiles keep their full name.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        Some(self.split_extension(name).0)
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        self.split_extension(name).1
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    fn trimmed(&self) -> &str {
        self.slashed.trim_end_matches('/')
    }

    fn split_extension<'a>(&self, name: &'a str) -> (&'a str, Option<&'a str>) {
        match name.rfind('.') {
            Some(dot) if dot > 0 => (&name[..dot], Some(&name[dot + 1..])),
            _ => (name, None),
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.slashed)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slashed)
    }
}
