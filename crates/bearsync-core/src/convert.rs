//! Conversion between source-store note bodies and vault documents
//!
//! A vault document is a front-matter block carrying the note identifier and
//! metadata, followed by the note body with attachment references rewritten
//! to vault-relative paths.

use crate::attachments::AttachmentMap;
use crate::model::Note;
use chrono::{DateTime, Utc};

/// Bear pads empty lines with U+2800 (Braille pattern blank)
const BLANK_SPACER: char = '\u{2800}';

const FENCE_OPEN: &str = "---\n";
const FENCE_CLOSE: &str = "\n---\n";

/// Front-matter key holding the note identifier
pub const ID_KEY: &str = "bear_id";

/// Timestamp layout used in front matter
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Metadata written ahead of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub id: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub archived: bool,
    pub pinned: bool,
}

impl FrontMatter {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            created: note.created,
            modified: note.modified,
            archived: note.archived,
            pinned: note.pinned,
        }
    }

    fn render(&self) -> String {
        [
            "---".to_string(),
            format!("{}: {}", ID_KEY, self.id),
            format!("created: {}", self.created.format(TIMESTAMP_FORMAT)),
            format!("modified: {}", self.modified.format(TIMESTAMP_FORMAT)),
            format!("archived: {}", self.archived),
            format!("pinned: {}", self.pinned),
            "---".to_string(),
            String::new(),
        ]
        .join("\n")
    }
}

/// Convert a note body into a vault document.
pub fn to_destination_format(body: &str, front: &FrontMatter, attachments: &AttachmentMap) -> String {
    let mut content: String = body.chars().filter(|c| *c != BLANK_SPACER).collect();

    for (source_ref, vault_ref) in attachments.iter() {
        content = content.replace(source_ref, vault_ref);
    }

    let mut document = front.render();
    document.push_str(&content);
    document
}

/// Convert a vault document back into a note body.
///
/// `inverse` maps vault attachment paths back to source references, see
/// [`AttachmentMap::inverse`].
pub fn to_source_format(document: &str, inverse: &AttachmentMap) -> String {
    let mut content = strip_frontmatter(document).to_string();
    for (vault_ref, source_ref) in inverse.iter() {
        content = content.replace(vault_ref, source_ref);
    }
    content
}

/// Split a document into its front-matter block and the remainder.
fn split_frontmatter(document: &str) -> Option<(&str, &str)> {
    if !document.starts_with(FENCE_OPEN) {
        return None;
    }
    let end = document[FENCE_OPEN.len()..].find(FENCE_CLOSE)? + FENCE_OPEN.len();
    Some((
        &document[FENCE_OPEN.len()..end],
        &document[end + FENCE_CLOSE.len()..],
    ))
}

/// Remove the front-matter block, returning the document unchanged if it has
/// none.
pub fn strip_frontmatter(document: &str) -> &str {
    match split_frontmatter(document) {
        Some((_, body)) => body,
        None => document,
    }
}

/// Read the note identifier recorded in a document's front matter.
pub fn extract_identifier(document: &str) -> Option<String> {
    let (block, _) = split_frontmatter(document)?;
    let value: serde_yaml::Value = serde_yaml::from_str(block).ok()?;

    match value.get(ID_KEY)? {
        serde_yaml::Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
