//! Filesystem layer for bearsync
//!
//! Provides vault path handling, content fingerprints and safe I/O
//! operations shared by the core and CLI crates.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{fingerprint, fingerprint_file};
pub use config::{ConfigStore, Format};
pub use constants::VaultPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
