//! Core reconciliation layer for bearsync
//!
//! This crate keeps a Bear note database and a Markdown vault consistent,
//! implementing:
//!
//! - **Identity & path assignment**: Stable, collision-free file names per note
//! - **Sync state**: Persistent record of the last reconciled fingerprints
//! - **Change classification**: Three-way comparison of source, vault and state
//! - **SyncEngine**: Status, export, pull and push runs
//!
//! # Architecture
//!
//! `bearsync-core` sits above `bearsync-fs` and below the CLI:
//!
//! ```text
//!                     bearsync-cli
//!                          |
//!                    bearsync-core
//!                          |
//!     +---------+---------+---------+-----------+
//!     |         |         |         |           |
//!   source   writeback  convert  attachments  state
//!  (SQLite)  (x-callback)                       |
//!                                          bearsync-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use bearsync_core::{SyncEngine, VaultConfig};
//!
//! fn pull(vault: &std::path::Path) -> bearsync_core::Result<()> {
//!     let engine = SyncEngine::for_bear(VaultConfig::load_existing(vault)?)?;
//!     let mut state = engine.load_state()?;
//!     let report = engine.pull(&mut state)?;
//!     engine.save_state(&mut state)?;
//!     println!("{} created, {} updated", report.created, report.updated);
//!     Ok(())
//! }
//! ```

pub mod attachments;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod naming;
pub mod source;
pub mod state;
pub mod sync;
pub mod writeback;

pub use attachments::{AttachmentMap, copy_attachments};
pub use config::VaultConfig;
pub use convert::{
    FrontMatter, extract_identifier, strip_frontmatter, to_destination_format, to_source_format,
};
pub use error::{Error, Result};
pub use model::{AttachmentRef, Note};
pub use naming::{PathRegistry, note_folder, primary_tag, sanitize_title, tag_folder};
pub use source::{BearDatabase, MemorySource, NoteSource};
pub use state::{NoteState, SyncStateStore};
pub use sync::{
    ChangeKind, ChangeReport, NoteError, Observation, StatusReport, SyncEngine, SyncOptions,
    SyncReport, classify,
};
pub use writeback::{BearCallback, WriteBack};
