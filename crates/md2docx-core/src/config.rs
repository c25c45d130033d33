//! Conversion options.
//!
//! Options carry serde defaults and can be loaded from a TOML file, so a
//! front-end can ship a `md2docx.toml` next to its documents.

use std::fs;
use std::path::{Path, PathBuf};

use md2docx_diagrams::{DEFAULT_ENDPOINT, Theme};
use serde::Deserialize;

/// Error loading conversion options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`ConvertOptions`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Options for one conversion run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Diagram rendering theme.
    pub theme: Theme,
    /// Insert a table-of-contents placeholder after the title.
    pub include_toc: bool,
    /// Directory where rendered diagram images are written. Callers
    /// running conversions concurrently should namespace this per run.
    pub image_dir: PathBuf,
    /// Diagram rendering service endpoint.
    pub render_url: String,
    /// Base directory for resolving relative image references.
    pub base_dir: PathBuf,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            include_toc: true,
            image_dir: PathBuf::from("output/images"),
            render_url: DEFAULT_ENDPOINT.to_owned(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl ConvertOptions {
    /// Parse options from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a TOML file.
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}
