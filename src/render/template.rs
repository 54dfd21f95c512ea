//! User supplied output templates.
//!
//! A template is rendered once per result. The result is bound to `result`
//! and, when it is a mapping, its entries are bound as top-level variables
//! as well. The `yaml`, `json` and `jsonpretty` filters (plus their short
//! aliases) serialize a value the same way the path functions do.
//!
//! # Example
//!
//! ```
//! use stool::document::Value;
//! use stool::render::template::OutputTemplate;
//!
//! let template = OutputTemplate::new("ID: {{ result }}\n", 4).unwrap();
//! let text = template.render(&[Value::from("a"), Value::from("b")]).unwrap();
//! assert_eq!(text, "ID: a\nID: b\n");
//! ```

use crate::document::node::Value;
use crate::document::parser::from_json_value;
use crate::document::serialize::{to_json, to_json_pretty, to_yaml};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use minijinja::{Environment, Error, ErrorKind};
use std::fs;
use std::path::Path;

const TEMPLATE_NAME: &str = "template";

/// Variable the current result is bound to.
pub const RESULT_VAR: &str = "result";

/// A parsed output template.
pub struct OutputTemplate {
    env: Environment<'static>,
}

impl OutputTemplate {
    /// Parses `source`. `indent_size` is used by the `jsonpretty` filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not parse.
    pub fn new(source: impl Into<String>, indent_size: usize) -> Result<Self> {
        let mut env = environment(indent_size);
        env.add_template_owned(TEMPLATE_NAME, source.into())
            .context("unable to parse template")?;
        Ok(OutputTemplate { env })
    }

    /// Reads and parses the template stored at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P, indent_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("could not read template file {:?}", path))?;
        Self::new(source, indent_size)
    }

    /// Renders the template once per result and joins the pieces.
    pub fn render(&self, results: &[Value]) -> Result<String> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .context("template is not loaded")?;
        let mut out = String::new();
        for (idx, result) in results.iter().enumerate() {
            let text = template
                .render(context_for(result))
                .with_context(|| format!("could not render result {} with template", idx))?;
            out.push_str(&text);
        }
        Ok(out)
    }
}

fn environment(indent_size: usize) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);

    env.add_filter("yaml", yaml_filter);
    env.add_filter("yml", yaml_filter);
    env.add_filter("json", json_filter);
    env.add_filter("js", json_filter);
    let pretty = move |value: minijinja::Value| -> Result<String, Error> {
        to_json_pretty(&to_document(&value)?, indent_size).map_err(|err| filter_error("JSON", err))
    };
    env.add_filter("jsonpretty", pretty);
    env.add_filter("jspretty", pretty);
    env
}

fn context_for(result: &Value) -> IndexMap<&str, &Value> {
    let mut context = IndexMap::new();
    if let Value::Mapping(map) = result {
        for (key, value) in map {
            context.insert(key.as_str(), value);
        }
    }
    context.insert(RESULT_VAR, result);
    context
}

fn yaml_filter(value: minijinja::Value) -> Result<String, Error> {
    to_yaml(&to_document(&value)?).map_err(|err| filter_error("YAML", err))
}

fn json_filter(value: minijinja::Value) -> Result<String, Error> {
    to_json(&to_document(&value)?).map_err(|err| filter_error("JSON", err))
}

/// Converts a template value back into a document value.
fn to_document(value: &minijinja::Value) -> Result<Value, Error> {
    let json = serde_json::to_value(value).map_err(|err| filter_error("JSON", err))?;
    Ok(from_json_value(&json))
}

fn filter_error<E>(format: &str, err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::new(
        ErrorKind::InvalidOperation,
        format!("could not serialize value as {}", format),
    )
    .with_source(err)
}
