//! [`NoteBuilder`] for in-memory notes.

use bearsync_core::{AttachmentRef, Note};
use chrono::{DateTime, TimeZone, Utc};

/// Builder for [`Note`] values with fixed, readable timestamps.
///
/// # Example
///
/// ```rust
/// use bearsync_test_utils::NoteBuilder;
///
/// let note = NoteBuilder::new("A", "Alpha").text("# Alpha\n#work").tag("work").build();
/// assert_eq!(note.tags, vec!["work".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct NoteBuilder {
    note: Note,
}

impl NoteBuilder {
    /// A note whose body is just its title as a heading.
    pub fn new(id: &str, title: &str) -> Self {
        let mut note = Note::new(id, title, format!("# {title}\n"));
        note.created = fixed_time(0);
        note.modified = fixed_time(0);
        Self { note }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.note.text = text.to_string();
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.note.add_tag(tag);
        self
    }

    pub fn pinned(mut self) -> Self {
        self.note.pinned = true;
        self
    }

    pub fn archived(mut self) -> Self {
        self.note.archived = true;
        self
    }

    /// Modified this many seconds after the fixed creation time.
    pub fn modified_after(mut self, seconds: i64) -> Self {
        self.note.modified = fixed_time(seconds);
        self
    }

    pub fn attachment(mut self, attachment: AttachmentRef) -> Self {
        self.note.attachments.push(attachment);
        self
    }

    pub fn build(self) -> Note {
        self.note
    }
}

/// 2024-01-01T00:00:00 UTC plus `offset` seconds.
pub fn fixed_time(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .map(|t| t + chrono::Duration::seconds(offset))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
