//! Attachment binding
//!
//! Maps attachment references embedded in note bodies to files copied next
//! to the note in the vault, and copies those files.

use crate::Result;
use crate::model::AttachmentRef;
use bearsync_fs::{NormalizedPath, VaultPath, io};
use std::collections::BTreeMap;

/// Ordered mapping of embedded reference -> rewritten reference.
///
/// Built in the source -> vault direction; [`AttachmentMap::inverse`] gives
/// the vault -> source direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentMap {
    entries: BTreeMap<String, String>,
}

impl AttachmentMap {
    /// Bind every attachment whose source file can be found.
    ///
    /// Unresolvable attachments are left out and keep their original
    /// reference in the document.
    pub fn build(attachments: &[AttachmentRef]) -> Self {
        let entries = attachments
            .iter()
            .filter(|att| att.source_path.as_ref().is_some_and(|p| p.exists()))
            .map(|att| (att.embedded_ref(), vault_ref(att)))
            .collect();
        Self { entries }
    }

    /// The same binding in the opposite direction.
    pub fn inverse(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(from, to)| (to.clone(), from.clone()))
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    pub fn get(&self, reference: &str) -> Option<&str> {
        self.entries.get(reference).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reference to an attachment relative to the folder of its note.
pub fn vault_ref(attachment: &AttachmentRef) -> String {
    format!("{}/{}", VaultPath::AttachmentsDir, attachment.filename)
}

/// Copy a note's attachments into `<note_folder>/_attachments/`.
///
/// A file is copied only if the destination is absent or its size differs
/// from the source. Attachments whose source file is missing are skipped.
/// Returns the number of files copied.
pub fn copy_attachments(attachments: &[AttachmentRef], note_folder: &NormalizedPath) -> Result<usize> {
    let mut copied = 0;

    for att in attachments {
        let Some(source) = att.source_path.as_ref().filter(|p| p.exists()) else {
            tracing::debug!(attachment = %att.embedded_ref(), "Attachment source missing, skipping");
            continue;
        };

        let source = NormalizedPath::new(source);
        let target = note_folder.join(&vault_ref(att));

        if io::file_size(&target) == io::file_size(&source) {
            continue;
        }

        io::copy_file(&source, &target)?;
        tracing::debug!(from = %source, to = %target, "Copied attachment");
        copied += 1;
    }

    Ok(copied)
}
