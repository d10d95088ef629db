//! Write-back into the source application
//!
//! The only side-effecting call into the source application. A successful
//! call means the overwrite was *requested*; callers confirm it by reading
//! the note back from the [`NoteSource`](crate::source::NoteSource).

use crate::{Error, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::process::Command;

/// Everything except RFC 3986 unreserved characters is escaped
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Capability to ask the source application to replace a note's body.
pub trait WriteBack {
    fn request_overwrite(&self, id: &str, body: &str) -> Result<()>;
}

/// Requests overwrites through Bear's `x-callback-url` scheme.
///
/// The URL is handed to `open -g` so Bear stays in the background.
#[derive(Debug, Clone)]
pub struct BearCallback {
    launcher: String,
}

impl Default for BearCallback {
    fn default() -> Self {
        Self {
            launcher: "open".to_string(),
        }
    }
}

impl BearCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different URL launcher program, which receives `-g <url>`.
    pub fn with_launcher(launcher: impl Into<String>) -> Self {
        Self {
            launcher: launcher.into(),
        }
    }

    /// Build the `add-text` callback URL replacing the whole note.
    pub fn callback_url(id: &str, body: &str) -> String {
        format!(
            "bear://x-callback-url/add-text?id={}&mode=replace_all&text={}",
            utf8_percent_encode(id, QUERY_VALUE),
            utf8_percent_encode(body, QUERY_VALUE)
        )
    }
}

impl WriteBack for BearCallback {
    fn request_overwrite(&self, id: &str, body: &str) -> Result<()> {
        let url = Self::callback_url(id, body);
        tracing::debug!(id, launcher = %self.launcher, "Requesting overwrite");

        let output = Command::new(&self.launcher)
            .arg("-g")
            .arg(&url)
            .output()
            .map_err(|e| Error::WriteBack {
                id: id.to_string(),
                reason: format!("could not run {}: {}", self.launcher, e),
            })?;

        if !output.status.success() {
            return Err(Error::WriteBack {
                id: id.to_string(),
                reason: format!(
                    "{} exited with {}: {}",
                    self.launcher,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_url_escapes_body() {
        let url = BearCallback::callback_url("AB-12", "# Title\nx & y = 100%");
        assert_eq!(
            url,
            "bear://x-callback-url/add-text?id=AB-12&mode=replace_all&text=%23%20Title%0Ax%20%26%20y%20%3D%20100%25"
        );
    }

    #[test]
    fn callback_url_escapes_non_ascii() {
        let url = BearCallback::callback_url("A", "café");
        assert!(url.ends_with("text=caf%C3%A9"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_launcher_is_reported() {
        let writer = BearCallback::with_launcher("false");
        let result = writer.request_overwrite("A", "body");
        assert!(matches!(result, Err(Error::WriteBack { .. })));
    }

    #[test]
    fn missing_launcher_is_reported() {
        let writer = BearCallback::with_launcher("definitely-not-a-real-launcher-binary");
        let result = writer.request_overwrite("A", "body");
        assert!(matches!(result, Err(Error::WriteBack { .. })));
    }
}
