//! Error types for bearsync-fs

use crate::config::Format;
use std::path::PathBuf;

/// Result type for bearsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bearsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filesystem call failed
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file could not be decoded
    #[error("{path} is not valid {format}: {message}")]
    Parse {
        path: PathBuf,
        format: Format,
        message: String,
    },

    /// A value could not be encoded for writing
    #[error("cannot encode {path} as {format}: {message}")]
    Encode {
        path: PathBuf,
        format: Format,
        message: String,
    },

    /// Only `.toml` and `.json` settings files are understood
    #[error("{path}: unknown settings format (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    /// Another process holds the file
    #[error("could not lock {path}")]
    Locked { path: PathBuf },
}

impl Error {
    /// Attach the offending path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
