//! Input format selection and detection.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref JSON_KEY: Regex = Regex::new(r#""\w+"\s*:"#).unwrap();
    static ref YAML_KEY: Regex = Regex::new(r"(?m)^\s*(- )?[\w-]+:").unwrap();
}

/// The structured formats stool can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Reads a user supplied format name.
    ///
    /// Unrecognized names return `None`, which means "detect it".
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" | "j" | "js" => Some(InputFormat::Json),
            "yaml" | "yml" | "y" => Some(InputFormat::Yaml),
            _ => None,
        }
    }

    /// The format tried when this one fails to decode.
    pub fn other(self) -> Self {
        match self {
            InputFormat::Json => InputFormat::Yaml,
            InputFormat::Yaml => InputFormat::Json,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Json => write!(f, "JSON"),
            InputFormat::Yaml => write!(f, "YAML"),
        }
    }
}

/// Guesses the format of `content`.
///
/// JSON is checked first because most JSON documents also look like YAML.
pub fn detect_format(content: &str) -> Option<InputFormat> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') || JSON_KEY.is_match(content) {
        return Some(InputFormat::Json);
    }
    if trimmed.starts_with("---") || YAML_KEY.is_match(content) {
        return Some(InputFormat::Yaml);
    }
    None
}
