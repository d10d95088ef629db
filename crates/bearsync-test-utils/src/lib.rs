//! Shared test utilities for the bearsync workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each build their own. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`bear`]: [`BearLibrary`] builder for a real Bear-shaped SQLite file
//! - [`notes`]: [`NoteBuilder`] for in-memory notes
//! - [`vault`]: [`TestVault`] temporary vault wired to an in-memory source
//! - [`writeback`]: [`ScriptedWriteBack`] test double

pub mod bear;
pub mod notes;
pub mod vault;
pub mod writeback;

pub use bear::BearLibrary;
pub use notes::NoteBuilder;
pub use vault::TestVault;
pub use writeback::{ScriptedWriteBack, WriteBackMode};
