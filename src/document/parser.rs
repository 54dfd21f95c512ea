//! Decoding JSON and YAML text into the generic [`Value`] tree.
//!
//! Both decoders go through their serde crate's own value type first and are
//! then converted. YAML mapping keys that are not strings (numbers, booleans,
//! null, or nested collections) are normalized to their textual form so that
//! every mapping in a [`Value`] is string-keyed.
//!
//! # Example
//!
//! ```
//! use stool::document::parser::{parse_json, parse_yaml};
//!
//! let from_json = parse_json(r#"{"name": "Alice", "tags": ["a", "b"]}"#).unwrap();
//! let from_yaml = parse_yaml("name: Alice\ntags:\n  - a\n  - b\n").unwrap();
//! assert_eq!(from_json, from_yaml);
//! ```

use super::node::{Number, Value};
use indexmap::IndexMap;
use serde::Deserialize;

/// Parses a JSON string into a [`Value`].
///
/// # Errors
///
/// Returns the underlying `serde_json` error when the text is not valid JSON.
pub fn parse_json(json_str: &str) -> Result<Value, serde_json::Error> {
    let serde_value: serde_json::Value = serde_json::from_str(json_str)?;
    Ok(from_json_value(&serde_value))
}

/// Parses a YAML string into a [`Value`].
///
/// A stream with a single document yields that document. A stream with
/// several `---` separated documents yields a sequence of them, in order.
/// An empty stream yields `Null`.
pub fn parse_yaml(yaml_str: &str) -> Result<Value, serde_yaml::Error> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml_str) {
        let serde_value = serde_yaml::Value::deserialize(document)?;
        documents.push(from_yaml_value(&serde_value));
    }

    match documents.len() {
        0 => Ok(Value::Null),
        1 => Ok(documents.remove(0)),
        count => {
            tracing::debug!(documents = count, "YAML stream holds multiple documents");
            Ok(Value::Sequence(documents))
        }
    }
}

/// Parses only the first document of a YAML stream.
///
/// Later `---` separated documents are ignored. An empty stream yields
/// `Null`.
pub fn parse_yaml_document(yaml_str: &str) -> Result<Value, serde_yaml::Error> {
    match serde_yaml::Deserializer::from_str(yaml_str).next() {
        Some(document) => {
            let serde_value = serde_yaml::Value::deserialize(document)?;
            Ok(from_yaml_value(&serde_value))
        }
        None => Ok(Value::Null),
    }
}

/// Converts a `serde_json::Value` into a [`Value`].
pub fn from_json_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(json_number(n)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.iter().map(from_json_value).collect())
        }
        serde_json::Value::Object(map) => Value::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), from_json_value(v)))
                .collect(),
        ),
    }
}

fn json_number(n: &serde_json::Number) -> Number {
    match n.as_i64() {
        Some(i) => Number::Integer(i),
        // u64 values above i64::MAX and all fractional numbers
        None => Number::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// Converts a `serde_yaml::Value` into a [`Value`].
///
/// Tags are dropped and the tagged value is converted in their place.
pub fn from_yaml_value(value: &serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => Value::Number(yaml_number(n)),
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            Value::Sequence(items.iter().map(from_yaml_value).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut entries = IndexMap::with_capacity(map.len());
            for (k, v) in map {
                entries.insert(yaml_key(k), from_yaml_value(v));
            }
            Value::Mapping(entries)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml_value(&tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Number {
    match n.as_i64() {
        Some(i) => Number::Integer(i),
        None => Number::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// Renders a YAML mapping key as the string used in the converted mapping.
fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Tagged(tagged) => yaml_key(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
