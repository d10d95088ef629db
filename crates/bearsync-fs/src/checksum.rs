//! Content fingerprints
//!
//! A fingerprint is `sha256:<hex>` over the exact bytes of a note body or a
//! vault document. It is the only change signal bearsync trusts; file
//! timestamps are never consulted.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

const SCHEME: &str = "sha256";

fn render(hasher: Sha256) -> String {
    format!("{SCHEME}:{:x}", hasher.finalize())
}

/// Fingerprint of a text, taken over its UTF-8 bytes.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    render(hasher)
}

/// Fingerprint of a file, streamed from disk.
///
/// Equal to [`fingerprint`] of the text the file holds.
pub fn fingerprint_file(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(render(hasher))
}
