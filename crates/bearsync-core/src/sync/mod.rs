//! Change detection and reconciliation
//!
//! This module provides:
//! - **check**: Classify every note against the last reconciled state
//! - **report**: Outcome types returned to the caller
//! - **engine**: Status, export, pull and push runs

mod check;
mod engine;
mod report;

pub use check::{ChangeKind, ChangeReport, classify};
pub use engine::{Observation, SyncEngine};
pub use report::{NoteError, StatusReport, SyncOptions, SyncReport};
