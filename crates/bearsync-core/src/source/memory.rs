//! In-memory note source

use super::NoteSource;
use crate::Result;
use crate::model::Note;
use std::cell::RefCell;
use std::rc::Rc;

/// A note source held in memory.
///
/// Clones share the same notes, so a handle kept by the caller observes and
/// drives changes seen by an engine that owns another handle.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    notes: Rc<RefCell<Vec<Note>>>,
}

impl MemorySource {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes: Rc::new(RefCell::new(notes)),
        }
    }

    /// Insert a note, replacing any note with the same identifier.
    pub fn upsert(&self, note: Note) {
        let mut notes = self.notes.borrow_mut();
        match notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => notes.push(note),
        }
    }

    /// Replace a note's body. Returns false if the note does not exist.
    pub fn set_text(&self, id: &str, text: &str) -> bool {
        let mut notes = self.notes.borrow_mut();
        match notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a note, returning it if it existed.
    pub fn remove(&self, id: &str) -> Option<Note> {
        let mut notes = self.notes.borrow_mut();
        let pos = notes.iter().position(|n| n.id == id)?;
        Some(notes.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<Note> {
        self.notes.borrow().iter().find(|n| n.id == id).cloned()
    }
}

impl NoteSource for MemorySource {
    fn fetch_all(&self) -> Result<Vec<Note>> {
        Ok(self.notes.borrow().clone())
    }

    fn fetch_by_id(&self, id: &str) -> Result<Option<Note>> {
        Ok(self.get(id))
    }
}
