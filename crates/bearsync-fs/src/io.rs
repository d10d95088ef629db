//! Vault file I/O
//!
//! Note documents and the state file are replaced through a locked sibling
//! temp file and a rename, so readers never observe a half-written file.

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn ensure_parent(target: &Path) -> Result<()> {
    match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
        }
        _ => Ok(()),
    }
}

/// `.<name>.<pid>.tmp` next to `target`.
fn sibling_temp(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// Replace `path` with `content`, creating parent directories.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    ensure_parent(&target)?;

    let temp = sibling_temp(&target);
    let write = || -> Result<()> {
        let mut file = File::create(&temp).map_err(|e| Error::io(&temp, e))?;
        file.lock_exclusive().map_err(|_| Error::Locked {
            path: target.clone(),
        })?;
        file.write_all(content)
            .and_then(|()| file.sync_all())
            .map_err(|e| Error::io(&temp, e))?;
        // Dropping the handle releases the lock
        Ok(())
    };

    if let Err(e) = write() {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }

    fs::rename(&temp, &target).map_err(|e| Error::io(&target, e))?;
    tracing::trace!(path = %path, bytes = content.len(), "Replaced file");
    Ok(())
}

/// Read a whole UTF-8 file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let source = path.to_native();
    fs::read_to_string(&source).map_err(|e| Error::io(source, e))
}

/// [`write_atomic`] for text.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Copy a binary file, creating the destination's parent directories.
/// Returns the number of bytes copied.
pub fn copy_file(from: &NormalizedPath, to: &NormalizedPath) -> Result<u64> {
    let target = to.to_native();
    ensure_parent(&target)?;
    fs::copy(from.to_native(), &target).map_err(|e| Error::io(&target, e))
}

/// Size in bytes, `None` when the file is absent or unreadable.
pub fn file_size(path: &NormalizedPath) -> Option<u64> {
    fs::metadata(path.to_native()).map(|m| m.len()).ok()
}
