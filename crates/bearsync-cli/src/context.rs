//! Vault discovery
//!
//! Commands work from anywhere inside a vault: the vault root is the nearest
//! ancestor holding `.bearsync/config.toml`.

use std::path::{Path, PathBuf};

use bearsync_fs::VaultPath;

use crate::error::{CliError, Result};

/// Walk up from `start` to the nearest directory that is a vault.
pub fn find_vault(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(VaultPath::ConfigFile.as_str()).is_file())
        .map(Path::to_path_buf)
}

/// Resolve the vault a command operates on.
///
/// An explicit path must itself be a vault; otherwise the search starts at
/// `cwd`.
pub fn resolve_vault(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            let path = dunce::canonicalize(path).map_err(|e| {
                CliError::user(format!("Cannot open vault {}: {}", path.display(), e))
            })?;
            if !path.join(VaultPath::ConfigFile.as_str()).is_file() {
                return Err(CliError::user(format!(
                    "{} is not a bearsync vault (run `bearsync init` first)",
                    path.display()
                )));
            }
            Ok(path)
        }
        None => {
            let cwd = dunce::canonicalize(cwd)?;
            find_vault(&cwd).ok_or_else(|| {
                CliError::user(
                    "Not inside a bearsync vault (run `bearsync init <dir>` or pass --vault)",
                )
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_vault(dir: &Path) {
        fs::create_dir_all(dir.join(".bearsync")).unwrap();
        fs::write(dir.join(".bearsync/config.toml"), "").unwrap();
    }

    #[test]
    fn finds_vault_from_nested_folder() {
        let temp = TempDir::new().unwrap();
        make_vault(temp.path());
        let nested = temp.path().join("work/projects");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_vault(&nested), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn no_vault_outside() {
        let temp = TempDir::new().unwrap();
        assert_eq!(find_vault(temp.path()), None);
        assert!(resolve_vault(None, temp.path()).is_err());
    }

    #[test]
    fn explicit_path_must_be_a_vault() {
        let temp = TempDir::new().unwrap();
        let result = resolve_vault(Some(temp.path()), Path::new("/"));
        assert!(matches!(result, Err(CliError::User { .. })));

        make_vault(temp.path());
        let resolved = resolve_vault(Some(temp.path()), Path::new("/")).unwrap();
        assert_eq!(resolved, dunce::canonicalize(temp.path()).unwrap());
    }
}
