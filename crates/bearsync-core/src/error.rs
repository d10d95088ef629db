//! Error types for bearsync-core

use std::path::PathBuf;

/// Result type for bearsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bearsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source note database could not be found or opened
    #[error("Bear database not available at {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// A query against the source note database failed
    #[error("Bear database query failed: {0}")]
    Source(#[from] rusqlite::Error),

    /// The persisted sync state exists but cannot be trusted
    #[error("Sync state at {path} is corrupt: {message}")]
    CorruptState { path: PathBuf, message: String },

    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The external write-back request could not be issued
    #[error("Write-back failed for note {id}: {reason}")]
    WriteBack { id: String, reason: String },

    /// The source store did not reflect a requested write-back
    #[error("Verification failed for note {id}: {reason}")]
    VerificationFailed { id: String, reason: String },

    /// A vault file claims to belong to a different note
    #[error("File {file} belongs to note {found}, expected {expected}")]
    IdentifierMismatch {
        file: String,
        expected: String,
        found: String,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from bearsync-fs
    #[error(transparent)]
    Fs(#[from] bearsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
