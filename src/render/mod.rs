//! Rendering query results as text.
//!
//! Each result is rendered on its own and the pieces are concatenated in
//! result order, either with a fixed [`RenderStyle`] or with a user
//! supplied [`template::OutputTemplate`].

pub mod template;

use crate::document::node::Value;
use crate::document::serialize::{to_json, to_json_pretty, to_yaml};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How results are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// One YAML document per result
    #[default]
    Yaml,
    /// Compact JSON, one result per line
    Json,
    /// Indented JSON
    Jsonpretty,
    /// Strings verbatim, everything else as compact JSON
    Raw,
}

/// Renders every result with `style` and joins them.
///
/// `indent_size` only applies to [`RenderStyle::Jsonpretty`].
pub fn render(results: &[Value], style: RenderStyle, indent_size: usize) -> Result<String> {
    let mut out = String::new();
    for (idx, result) in results.iter().enumerate() {
        let text = render_one(result, style, indent_size)
            .with_context(|| format!("could not render result {}", idx))?;
        out.push_str(&text);
    }
    Ok(out)
}

fn render_one(value: &Value, style: RenderStyle, indent_size: usize) -> Result<String> {
    let mut text = match style {
        RenderStyle::Yaml => return Ok(to_yaml(value)?),
        RenderStyle::Json => to_json(value)?,
        RenderStyle::Jsonpretty => to_json_pretty(value, indent_size)?,
        RenderStyle::Raw => match value {
            Value::String(s) => s.clone(),
            other => to_json(other)?,
        },
    };
    text.push('\n');
    Ok(text)
}
