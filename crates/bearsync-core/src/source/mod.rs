//! Source store collaborators
//!
//! The source store is the authoritative note database. This crate only ever
//! reads it: once per command for a snapshot, and once more per pushed note to
//! verify a write-back landed.

mod bear;
mod memory;

pub use bear::BearDatabase;
pub use memory::MemorySource;

use crate::Result;
use crate::model::Note;

/// Read-only access to the source note store.
pub trait NoteSource {
    /// Every note that is neither trashed nor encrypted.
    fn fetch_all(&self) -> Result<Vec<Note>>;

    /// A single note by identifier, `None` if it no longer exists.
    fn fetch_by_id(&self, id: &str) -> Result<Option<Note>>;
}
