//! Identity and path assignment
//!
//! Turns note titles and tags into safe, human-readable vault paths and
//! guarantees that no two notes resolve to the same file within one run.

use crate::model::Note;
use bearsync_fs::{NormalizedPath, VaultPath};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Name used when a title sanitizes down to nothing
pub const DEFAULT_NAME: &str = "Untitled";

/// Longest file stem produced, leaving room for a suffix and extension
const MAX_NAME_LEN: usize = 200;

/// Extension of every note document
const NOTE_EXTENSION: &str = "md";

static INVALID_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("Invalid filename character regex")
});

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_ ]{2,}").expect("Invalid separator run regex"));

/// An inline `#tag` preceded by start of text or whitespace.
static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([\w/\-]+)").expect("Invalid inline tag regex"));

/// Clean a single path component; may return an empty string.
fn clean_component(raw: &str) -> String {
    let replaced = INVALID_CHARS.replace_all(raw.trim(), "_");
    let collapsed = SEPARATOR_RUNS.replace_all(&replaced, " ");
    let trimmed = collapsed.trim_matches(['.', ' ']);

    if trimmed.chars().count() > MAX_NAME_LEN {
        let truncated: String = trimmed.chars().take(MAX_NAME_LEN).collect();
        truncated
            .trim_end_matches(['.', ' '])
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Convert a note title into a safe file stem.
pub fn sanitize_title(title: &str) -> String {
    let name = clean_component(title);
    if name.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        name
    }
}

/// Find the tag that decides where a note is filed.
///
/// Scans the body for inline tags in document order and returns the first one
/// that is also a known tag of the note. Falls back to the first known tag.
pub fn primary_tag<'a>(text: &str, tags: &'a [String]) -> Option<&'a str> {
    if tags.is_empty() {
        return None;
    }

    for caps in INLINE_TAG.captures_iter(text) {
        let candidate = &caps[1];
        if let Some(tag) = tags.iter().find(|t| t.as_str() == candidate) {
            return Some(tag.as_str());
        }
    }

    tags.first().map(String::as_str)
}

/// Convert a tag into a relative folder path.
///
/// `#areas/work/` becomes `areas/work`. Each segment is sanitized like a
/// title and empty segments are dropped, so a tag can never climb out of the
/// vault.
pub fn tag_folder(tag: &str) -> NormalizedPath {
    let clean = tag.trim_matches(['#', '/']);

    let segments: Vec<String> = clean
        .split('/')
        .map(clean_component)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        NormalizedPath::new(VaultPath::UntaggedDir.as_str())
    } else {
        NormalizedPath::new(segments.join("/"))
    }
}

/// Folder a note is filed into, relative to the vault root.
pub fn note_folder(note: &Note) -> NormalizedPath {
    match primary_tag(&note.text, &note.tags) {
        Some(tag) => tag_folder(tag),
        None => NormalizedPath::new(VaultPath::UntaggedDir.as_str()),
    }
}

/// Case-insensitive registry of vault paths issued during one run.
///
/// Not a lock: it only prevents collisions between notes handled by the same
/// process.
#[derive(Debug, Default)]
pub struct PathRegistry {
    /// Lowercased path -> number of times its base name was requested
    used: HashMap<String, u32>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &NormalizedPath) -> String {
        path.as_str().to_lowercase()
    }

    /// Reserve a path that is already in use, such as a tracked note's file.
    pub fn claim(&mut self, path: &NormalizedPath) {
        self.used.entry(Self::key(path)).or_insert(1);
    }

    /// Whether `path` has already been issued or claimed.
    pub fn is_taken(&self, path: &NormalizedPath) -> bool {
        self.used.contains_key(&Self::key(path))
    }

    /// Issue a fresh `<folder>/<title>.md` path.
    ///
    /// On collision a numeric suffix is appended (`Title 2.md`, `Title 3.md`,
    /// ...), cascading upward until a free name is found.
    pub fn issue(&mut self, folder: &NormalizedPath, title: &str) -> NormalizedPath {
        let base = sanitize_title(title);
        let candidate = folder.join(&format!("{base}.{NOTE_EXTENSION}"));
        let key = Self::key(&candidate);

        let mut n = match self.used.get_mut(&key) {
            None => {
                self.used.insert(key, 1);
                return candidate;
            }
            Some(count) => {
                *count += 1;
                *count
            }
        };

        loop {
            let candidate = folder.join(&format!("{base} {n}.{NOTE_EXTENSION}"));
            let key = Self::key(&candidate);
            if !self.used.contains_key(&key) {
                self.used.insert(key, 1);
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Shopping list", "Shopping list")]
    #[case("  padded  ", "padded")]
    #[case("", "Untitled")]
    #[case("   ", "Untitled")]
    #[case("a/b:c", "a_b_c")]
    #[case("What? <yes>", "What yes_")]
    #[case("too   many   spaces", "too many spaces")]
    #[case("under__scores", "under scores")]
    #[case("...hidden.", "hidden")]
    #[case("???", "Untitled")]
    #[case("..", "Untitled")]
    #[case("tab\there", "tab_here")]
    fn test_sanitize_title(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_title(input), expected);
    }

    #[test]
    fn test_sanitize_title_caps_length() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_title(&long).chars().count(), 200);
    }

    #[test]
    fn test_sanitize_title_truncation_strips_trailing_dots() {
        let title = format!("{}.{}", "a".repeat(199), "b".repeat(10));
        assert_eq!(sanitize_title(&title), "a".repeat(199));
    }

    #[test]
    fn test_issue_deduplicates_in_order() {
        let mut registry = PathRegistry::new();
        let folder = NormalizedPath::new("work");

        let first = registry.issue(&folder, "Meeting");
        let second = registry.issue(&folder, "Meeting");
        let third = registry.issue(&folder, "meeting");

        assert_eq!(first.as_str(), "work/Meeting.md");
        assert_eq!(second.as_str(), "work/Meeting 2.md");
        assert_eq!(third.as_str(), "work/meeting 3.md");
    }

    #[test]
    fn test_issue_cascades_past_claimed_suffix() {
        let mut registry = PathRegistry::new();
        let folder = NormalizedPath::new("work");
        registry.claim(&NormalizedPath::new("work/Plan.md"));
        registry.claim(&NormalizedPath::new("work/Plan 2.md"));

        let issued = registry.issue(&folder, "Plan");

        assert_eq!(issued.as_str(), "work/Plan 3.md");
    }

    #[test]
    fn test_same_title_in_different_folders_does_not_collide() {
        let mut registry = PathRegistry::new();
        let a = registry.issue(&NormalizedPath::new("work"), "Todo");
        let b = registry.issue(&NormalizedPath::new("home"), "Todo");
        assert_eq!(a.as_str(), "work/Todo.md");
        assert_eq!(b.as_str(), "home/Todo.md");
    }

    #[test]
    fn test_primary_tag_prefers_first_inline_known_tag() {
        let tags = vec!["home".to_string(), "work/projects".to_string()];
        let text = "# Plan\nSee #misc and #work/projects then #home";
        assert_eq!(primary_tag(text, &tags), Some("work/projects"));
    }

    #[test]
    fn test_primary_tag_ignores_headings_and_falls_back() {
        let tags = vec!["home".to_string()];
        let text = "# Heading\n## Sub\nno inline tags";
        assert_eq!(primary_tag(text, &tags), Some("home"));
    }

    #[test]
    fn test_primary_tag_requires_whitespace_before_hash() {
        let tags = vec!["a".to_string(), "b".to_string()];
        assert_eq!(primary_tag("x#b #a", &tags), Some("a"));
    }

    #[test]
    fn test_primary_tag_none_without_tags() {
        assert_eq!(primary_tag("#work", &[]), None);
    }

    #[rstest]
    #[case("work", "work")]
    #[case("#areas/work/", "areas/work")]
    #[case("/", "_untagged")]
    #[case("a//b", "a/b")]
    #[case("../escape", "escape")]
    #[case("client: acme", "client acme")]
    fn test_tag_folder(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(tag_folder(tag).as_str(), expected);
    }

    #[test]
    fn test_note_folder_untagged() {
        let note = Note::new("C", "Loose", "no tags here");
        assert_eq!(note_folder(&note).as_str(), "_untagged");
    }
}
