//! Sources file read/write.
//!
//! The sources file holds a single `streams` list. JSON is the native
//! format; files ending in `.toml` are read as TOML with `[[streams]]`
//! tables.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::record::RawStreamRecord;

/// On-disk format of a sources file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum SourceFormat {
    /// `{ "streams": [...] }`
    Json,
    /// `[[streams]]` tables.
    Toml,
}

impl SourceFormat {
    /// Picks the format from the file extension. Anything but `.toml` is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Parsed, not yet validated, sources file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct SourceFile {
    /// Stream entries in grid order.
    pub streams: Vec<RawStreamRecord>,
}

impl SourceFile {
    /// A small example file used by `init`.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            streams: vec![
                RawStreamRecord::new("jfKfPfyJRdk", "Lofi Radio", "Beats to relax/study to"),
                RawStreamRecord::new("21X5lGlDOfg", "NASA Live", "Official NASA stream"),
            ],
        }
    }

    /// Writes the file in the format implied by its extension, creating
    /// parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation, directory creation or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = match SourceFormat::from_path(path) {
            SourceFormat::Json => {
                serde_json::to_string_pretty(self).context("failed to serialize sources to JSON")?
            }
            SourceFormat::Toml => {
                toml::to_string_pretty(self).context("failed to serialize sources to TOML")?
            }
        };
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Parses sources file content.
///
/// # Errors
///
/// Returns an error on syntax errors, a missing `streams` key, or
/// non-string record fields.
pub fn parse_sources(content: &str, format: SourceFormat) -> Result<SourceFile> {
    match format {
        SourceFormat::Json => serde_json::from_str(content).context("invalid JSON sources"),
        SourceFormat::Toml => toml::from_str(content).context("invalid TOML sources"),
    }
}

/// Reads and parses a sources file. This is a single pure read; nothing is
/// cached or watched.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_sources(path: &Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_sources(&content, SourceFormat::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))
}
