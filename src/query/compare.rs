//! Typed comparison of a value against the literal side of a predicate.
//!
//! The literal is interpreted according to the type of the value it is
//! compared with. A literal that cannot be read as that type never matches;
//! this is not an error, because one predicate is routinely applied to
//! candidates of mixed types.

use crate::document::node::{Number, Value};

/// Comparison operators allowed inside a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Operator {
    /// Parses an operator token; surrounding whitespace is ignored.
    pub fn parse(op: &str) -> Option<Operator> {
        match op.trim() {
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Le),
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::Ge),
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }

    fn holds<T: PartialOrd + ?Sized>(&self, left: &T, right: &T) -> bool {
        match self {
            Operator::Lt => left < right,
            Operator::Le => left <= right,
            Operator::Gt => left > right,
            Operator::Ge => left >= right,
            Operator::Eq => left == right,
            Operator::Ne => left != right,
        }
    }
}

/// Compares `value` with the predicate literal using operator text `op`.
///
/// Returns false for an unknown operator, for a literal that does not parse
/// as the value's type, and for any value that is not a number or string.
pub fn compare(value: &Value, literal: &str, op: &str) -> bool {
    match Operator::parse(op) {
        Some(operator) => compare_with(value, literal, operator),
        None => false,
    }
}

/// Like [`compare`] with an already parsed operator.
pub fn compare_with(value: &Value, literal: &str, operator: Operator) -> bool {
    let literal = literal.trim();
    match value {
        Value::Number(Number::Integer(left)) => match literal.parse::<i64>() {
            Ok(right) => operator.holds(left, &right),
            Err(_) => match literal.parse::<f64>() {
                Ok(right) => operator.holds(&(*left as f64), &right),
                Err(_) => false,
            },
        },
        Value::Number(number @ Number::Float(_)) => match literal.parse::<f64>() {
            Ok(right) => operator.holds(&number.as_f64(), &right),
            Err(_) => false,
        },
        Value::String(left) => match unquote(literal) {
            Some(right) => operator.holds(left.as_str(), right.as_str()),
            None => false,
        },
        Value::Null | Value::Bool(_) | Value::Sequence(_) | Value::Mapping(_) => false,
    }
}

/// Reads a quoted string literal, resolving escape sequences.
///
/// Accepts `"..."` and `'...'` with backslash escapes, and raw backtick
/// strings. Returns `None` for anything malformed.
pub fn unquote(literal: &str) -> Option<String> {
    let mut chars = literal.chars();
    let quote = chars.next()?;
    if !matches!(quote, '"' | '\'' | '`') {
        return None;
    }

    let mut value = String::new();
    loop {
        match chars.next()? {
            ch if ch == quote => break,
            '\\' if quote != '`' => value.push(unescape(&mut chars)?),
            ch => value.push(ch),
        }
    }

    // the closing quote must end the literal
    if chars.next().is_some() {
        return None;
    }
    Some(value)
}

fn unescape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    match chars.next()? {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        '/' => Some('/'),
        'u' => {
            let hex: String = chars.by_ref().take(4).collect();
            if hex.len() != 4 {
                return None;
            }
            u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
        }
        _ => None,
    }
}
