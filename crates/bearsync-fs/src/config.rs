//! Settings files in TOML or JSON
//!
//! [`ConfigStore`] picks the format from the file extension, so callers only
//! deal with their own serde types.

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

/// Serialization formats understood by [`ConfigStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Format implied by a path's extension (case-insensitive).
    pub fn of(path: &NormalizedPath) -> Result<Self> {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_native(),
            }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        })
    }
}

/// Reads and writes serde values as settings files.
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Decode a settings file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = Format::of(path)?;
        let text = io::read_text(path)?;
        let parse_error = |message: String| Error::Parse {
            path: path.to_native(),
            format,
            message,
        };

        match format {
            Format::Toml => toml::from_str(&text).map_err(|e| parse_error(e.to_string())),
            Format::Json => serde_json::from_str(&text).map_err(|e| parse_error(e.to_string())),
        }
    }

    /// Encode `value` and replace the file atomically.
    ///
    /// JSON output ends with a newline.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = Format::of(path)?;
        let encode_error = |message: String| Error::Encode {
            path: path.to_native(),
            format,
            message,
        };

        let text = match format {
            Format::Toml => {
                toml::to_string_pretty(value).map_err(|e| encode_error(e.to_string()))?
            }
            Format::Json => {
                serde_json::to_string_pretty(value).map_err(|e| encode_error(e.to_string()))? + "\n"
            }
        };

        io::write_text(path, &text)
    }
}
