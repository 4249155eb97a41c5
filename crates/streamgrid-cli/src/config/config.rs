//! `AppConfig` struct, config file location and TOML read/write.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use streamgrid_core::ValidationPolicy;
use streamgrid_core::grid::DEFAULT_COLUMNS;

/// Sources file name used when `[sources] path` is not set.
pub const DEFAULT_SOURCES_FILE: &str = "sources.json";

/// Page file name used when `[page] output` is not set.
pub const DEFAULT_OUTPUT_FILE: &str = "streamgrid.html";

/// Earthquake CSV file name used when `[quakes] output` is not set.
pub const DEFAULT_QUAKES_FILE: &str = "iceland_earthquakes.csv";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Where the stream list lives.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// How defective records are handled.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Page output settings.
    #[serde(default)]
    pub page: PageConfig,
    /// Earthquake feed settings.
    #[serde(default)]
    pub quakes: QuakesConfig,
}

/// Sources file settings.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SourcesConfig {
    /// Sources file. Relative paths resolve against the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Validation settings.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// `strict` or `lenient`.
    #[serde(default)]
    pub policy: ValidationPolicy,
}

/// Page output settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageConfig {
    /// Document title.
    pub title: String,
    /// Grid column count.
    pub columns: usize,
    /// Output file. Relative paths resolve against the config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Embed from `youtube-nocookie.com`.
    pub privacy_enhanced: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: String::from("Stream Grid"),
            columns: DEFAULT_COLUMNS,
            output: None,
            privacy_enhanced: false,
        }
    }
}

/// Earthquake feed settings.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct QuakesConfig {
    /// Page carrying the `VI.quakeInfo` table. Defaults to the Reykjanes
    /// peninsula page of the Icelandic Met Office.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// CSV output file. Relative paths resolve against the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Picks the config file when no directory is given: `$XDG_CONFIG_HOME`
/// if set to an absolute path, else `$HOME/.config`.
fn default_config_path(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    let base = match xdg_config_home.map(PathBuf::from) {
        Some(xdg) if xdg.is_absolute() => xdg,
        _ => PathBuf::from(home.context("neither XDG_CONFIG_HOME nor HOME is set")?)
            .join(".config"),
    };
    Ok(base.join("streamgrid").join(CONFIG_FILE))
}

/// Joins `path` onto `base` unless it is already absolute.
fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl AppConfig {
    /// Config file location: `{dir}/config.toml` when `dir` is given,
    /// otherwise `streamgrid/config.toml` under the user config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is `None` and neither `XDG_CONFIG_HOME` nor
    /// `HOME` is set.
    pub fn resolve_path(dir: Option<&Path>) -> Result<PathBuf> {
        dir.map_or_else(
            || {
                default_config_path(
                    std::env::var_os("XDG_CONFIG_HOME"),
                    std::env::var_os("HOME"),
                )
            },
            |d| Ok(d.join(CONFIG_FILE)),
        )
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Sources file location for a config living in `config_dir`.
    #[must_use]
    pub fn sources_path(&self, config_dir: &Path) -> PathBuf {
        self.sources.path.as_deref().map_or_else(
            || config_dir.join(DEFAULT_SOURCES_FILE),
            |p| resolve_against(config_dir, p),
        )
    }

    /// Page output location for a config living in `config_dir`.
    #[must_use]
    pub fn output_path(&self, config_dir: &Path) -> PathBuf {
        self.page.output.as_deref().map_or_else(
            || config_dir.join(DEFAULT_OUTPUT_FILE),
            |p| resolve_against(config_dir, p),
        )
    }

    /// Earthquake CSV location for a config living in `config_dir`.
    #[must_use]
    pub fn quakes_output_path(&self, config_dir: &Path) -> PathBuf {
        self.quakes.output.as_deref().map_or_else(
            || config_dir.join(DEFAULT_QUAKES_FILE),
            |p| resolve_against(config_dir, p),
        )
    }
}
