//! Built-in path functions (`name()` chunks).
//!
//! Every function maps the whole result set to a new one. Names are
//! case-sensitive and several have short aliases.

use super::error::QueryError;
use super::evaluator::{children, Candidates};
use crate::document::node::{Number, Value};
use crate::document::parser::{parse_json, parse_yaml_document};
use crate::document::serialize::{to_json, to_json_pretty, to_yaml};
use std::borrow::Cow;

/// Indentation used by `jsonpretty()`.
const PRETTY_INDENT: usize = 4;

/// Every recognized function name, aliases included.
pub const FUNCTION_NAMES: &[&str] = &[
    "len",
    "length",
    "json",
    "js",
    "jsonpretty",
    "jspretty",
    "jpretty",
    "jsoneval",
    "jeval",
    "yaml",
    "yml",
    "yamleval",
    "yeval",
    "keys",
    "flatten",
    "flat",
    "results",
];

/// Applies the function called `name` to the result set.
pub fn apply<'a>(candidates: Candidates<'a>, name: &str) -> Result<Candidates<'a>, QueryError> {
    match name {
        "len" | "length" => Ok(length(candidates)),
        "json" | "js" => serialize_each(candidates, "JSON", |value| {
            to_json(value).map_err(|e| e.to_string())
        }),
        "jsonpretty" | "jspretty" | "jpretty" => serialize_each(candidates, "JSON-Pretty", |value| {
            to_json_pretty(value, PRETTY_INDENT).map_err(|e| e.to_string())
        }),
        "yaml" | "yml" => serialize_each(candidates, "YAML", |value| {
            to_yaml(value).map_err(|e| e.to_string())
        }),
        "jsoneval" | "jeval" => deserialize_each(candidates, "JSON", |text| {
            parse_json(text).map_err(|e| e.to_string())
        }),
        "yamleval" | "yeval" => deserialize_each(candidates, "YAML", |text| {
            parse_yaml_document(text).map_err(|e| e.to_string())
        }),
        "keys" => Ok(keys(candidates)),
        "flatten" | "flat" => Ok(flatten(candidates)),
        "results" => Ok(results(candidates)),
        _ => {
            tracing::debug!(name, known = ?FUNCTION_NAMES, "unknown function");
            Err(QueryError::UnknownFunction {
                name: name.to_string(),
            })
        }
    }
}

/// Element count of collections, character count of strings, 1 otherwise.
fn length(candidates: Candidates<'_>) -> Candidates<'_> {
    candidates
        .into_iter()
        .map(|candidate| {
            let count = match candidate.as_ref() {
                Value::Sequence(items) => items.len(),
                Value::Mapping(map) => map.len(),
                Value::String(s) => s.chars().count(),
                _ => 1,
            };
            Cow::Owned(Value::Number(Number::Integer(count as i64)))
        })
        .collect()
}

fn serialize_each<'a, F>(
    candidates: Candidates<'a>,
    format: &'static str,
    serialize: F,
) -> Result<Candidates<'a>, QueryError>
where
    F: Fn(&Value) -> Result<String, String>,
{
    candidates
        .into_iter()
        .enumerate()
        .map(|(item, candidate)| {
            serialize(candidate.as_ref())
                .map(|text| Cow::Owned(Value::String(text)))
                .map_err(|message| QueryError::Serialization {
                    item,
                    format,
                    message,
                })
        })
        .collect()
}

/// Parses string candidates; anything that is not a string is dropped.
fn deserialize_each<'a, F>(
    candidates: Candidates<'a>,
    format: &'static str,
    deserialize: F,
) -> Result<Candidates<'a>, QueryError>
where
    F: Fn(&str) -> Result<Value, String>,
{
    let mut out = Vec::with_capacity(candidates.len());
    for (item, candidate) in candidates.iter().enumerate() {
        let Some(text) = candidate.as_str() else {
            continue;
        };
        let value = deserialize(text).map_err(|message| QueryError::Deserialization {
            item,
            format,
            message,
        })?;
        out.push(Cow::Owned(value));
    }
    Ok(out)
}

/// Key names of mapping candidates; other candidates are dropped.
fn keys(candidates: Candidates<'_>) -> Candidates<'_> {
    candidates
        .into_iter()
        .filter_map(|candidate| match candidate.as_ref() {
            Value::Mapping(map) => Some(Cow::Owned(Value::Sequence(
                map.keys().map(|key| Value::String(key.clone())).collect(),
            ))),
            _ => None,
        })
        .collect()
}

/// Splices collections one level; scalars are kept as they are.
fn flatten(candidates: Candidates<'_>) -> Candidates<'_> {
    let mut out = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match children(candidate) {
            Ok(elements) => out.extend(elements),
            Err(scalar) => out.push(scalar),
        }
    }
    out
}

/// Collapses the whole result set into a single sequence.
fn results(candidates: Candidates<'_>) -> Candidates<'_> {
    let items = candidates.into_iter().map(Cow::into_owned).collect();
    vec![Cow::Owned(Value::Sequence(items))]
}
