//! Text serialization of [`Value`] trees.

use super::node::Value;
use serde::Serialize;

/// Serializes a value as compact JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Serializes a value as JSON indented by `indent_size` spaces per level.
pub fn to_json_pretty(value: &Value, indent_size: usize) -> Result<String, serde_json::Error> {
    let indent = " ".repeat(indent_size);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Serializes a value as a YAML document. The text ends with a newline.
pub fn to_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_json;

    fn sample() -> Value {
        parse_json(r#"{"insects": ["fly", "ant"], "mollusks": ["clam"]}"#).unwrap()
    }

    #[test]
    fn test_to_json_compact() {
        assert_eq!(
            to_json(&sample()).unwrap(),
            r#"{"insects":["fly","ant"],"mollusks":["clam"]}"#
        );
    }

    #[test]
    fn test_to_json_pretty_four_spaces() {
        let expected = "{\n    \"insects\": [\n        \"fly\",\n        \"ant\"\n    ],\n    \"mollusks\": [\n        \"clam\"\n    ]\n}";
        assert_eq!(to_json_pretty(&sample(), 4).unwrap(), expected);
    }

    #[test]
    fn test_to_json_pretty_two_spaces() {
        let value = Value::from(vec!["a"]);
        assert_eq!(to_json_pretty(&value, 2).unwrap(), "[\n  \"a\"\n]");
    }

    #[test]
    fn test_to_yaml_sequence() {
        let value = Value::from(vec!["clam"]);
        assert_eq!(to_yaml(&value).unwrap(), "- clam\n");
    }

    #[test]
    fn test_to_yaml_scalars() {
        assert_eq!(to_yaml(&Value::Null).unwrap(), "null\n");
        assert_eq!(to_yaml(&Value::from(3_i64)).unwrap(), "3\n");
    }
}
