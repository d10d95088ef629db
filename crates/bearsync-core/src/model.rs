//! Note snapshot types observed from the source store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A binary file embedded in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// Identifier of the attachment in the source store
    pub id: String,
    /// File name as stored by the source application
    pub filename: String,
    /// Resolved location of the file, absent if it could not be found
    pub source_path: Option<PathBuf>,
}

impl AttachmentRef {
    pub fn new(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            source_path: None,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Reference string the source application embeds in note bodies.
    pub fn embedded_ref(&self) -> String {
        format!("{}/{}", self.id, self.filename)
    }
}

/// A point-in-time view of one note in the source store.
///
/// Notes are read-only to this crate: they are created, edited and deleted by
/// the source application and only observed once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub text: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub archived: bool,
    pub pinned: bool,
    /// Unique tags in first-seen order
    pub tags: Vec<String>,
    pub attachments: Vec<AttachmentRef>,
}

impl Note {
    /// Create a note with the given identity and body and no metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
            created: DateTime::<Utc>::UNIX_EPOCH,
            modified: DateTime::<Utc>::UNIX_EPOCH,
            archived: false,
            pinned: false,
            tags: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Append a tag unless it is already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Whether any of the note's tags is in `excluded`.
    pub fn has_any_tag(&self, excluded: &[String]) -> bool {
        self.tags.iter().any(|t| excluded.contains(t))
    }
}
