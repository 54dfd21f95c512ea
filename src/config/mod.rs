//! Configuration system for stool.
//!
//! Settings come from `~/.config/stool/config.toml` when it exists and fall
//! back to built-in defaults field by field. Command-line options override
//! whatever the file says.
//!
//! # Example
//!
//! ```
//! use stool::config::Config;
//! use stool::render::RenderStyle;
//!
//! let config = Config::from_toml_str("render = \"json\"\n").unwrap();
//! assert_eq!(config.render, RenderStyle::Json);
//! assert_eq!(config.input_format, "auto");
//! assert_eq!(config.indent_size, 4);
//! ```

use crate::file::detect::InputFormat;
use crate::render::RenderStyle;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the stool application.
///
/// # Fields
///
/// * `input_format` - "json", "yaml", or anything else to auto-detect (default: "auto")
/// * `render` - Output style for results (default: yaml)
/// * `indent_size` - Spaces per level for jsonpretty output (default: 4)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input format name, or "auto" to detect it
    #[serde(default = "default_input_format")]
    pub input_format: String,

    /// Output style for results
    #[serde(default)]
    pub render: RenderStyle,

    /// Number of spaces per indentation level for jsonpretty output
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,
}

fn default_input_format() -> String {
    "auto".to_string()
}

fn default_indent_size() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_format: default_input_format(),
            render: RenderStyle::default(),
            indent_size: default_indent_size(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/stool/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("stool");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    ///
    /// A missing file is silent; an unreadable or invalid one is logged.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let loaded = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))
            .and_then(|contents| Self::from_toml_str(&contents));

        match loaded {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring config file: {:#}", err);
                Self::default()
            }
        }
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config file")
    }

    /// The configured input format; `None` means detect it.
    pub fn input_format(&self) -> Option<InputFormat> {
        InputFormat::from_name(&self.input_format)
    }
}
