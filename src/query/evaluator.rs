use super::chunk::Chunk;
use super::compare::{compare_with, Operator};
use super::error::QueryError;
use super::functions;
use super::scanner::Scanner;
use crate::document::node::Value;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    /// Splits a predicate at its first comparison operator.
    static ref PREDICATE: Regex = Regex::new(r"(?s)^(.*?)(<=?|>=?|[!=]=)(.*)$").unwrap();
}

/// The working result set. Candidates borrow from the document until a
/// function produces a new value.
pub type Candidates<'a> = Vec<Cow<'a, Value>>;

pub struct Evaluator<'a> {
    root: &'a Value,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a Value) -> Self {
        Evaluator { root }
    }

    /// Evaluates `path` against the root and returns owned results.
    pub fn evaluate(&self, path: &str) -> Result<Vec<Value>, QueryError> {
        Ok(owned(self.evaluate_refs(path)?))
    }

    /// Evaluates `path` against the root, borrowing results where possible.
    pub fn evaluate_refs(&self, path: &str) -> Result<Candidates<'a>, QueryError> {
        run(vec![Cow::Borrowed(self.root)], path)
    }

    /// Applies already scanned chunks to the root.
    pub fn evaluate_chunks(&self, chunks: &[Chunk]) -> Result<Vec<Value>, QueryError> {
        let candidates = drive(vec![Cow::Borrowed(self.root)], chunks.iter().cloned().map(Ok))?;
        Ok(owned(candidates))
    }
}

fn owned(candidates: Candidates<'_>) -> Vec<Value> {
    candidates.into_iter().map(Cow::into_owned).collect()
}

/// Scans `path` lazily and applies each chunk to `candidates`.
fn run<'a>(candidates: Candidates<'a>, path: &str) -> Result<Candidates<'a>, QueryError> {
    let mut scanner = Scanner::new(path);
    let chunks = std::iter::from_fn(move || match scanner.next_chunk() {
        Ok(Chunk::Empty) => None,
        next => Some(next),
    });
    drive(candidates, chunks)
}

/// Applies each chunk to `candidates` in order.
///
/// Stops as soon as the chunks run out or no candidates remain; chunks
/// after that point are never pulled.
fn drive<'a, I>(mut candidates: Candidates<'a>, chunks: I) -> Result<Candidates<'a>, QueryError>
where
    I: IntoIterator<Item = Result<Chunk, QueryError>>,
{
    let mut chunks = chunks.into_iter();
    loop {
        if candidates.is_empty() {
            return Ok(candidates);
        }
        let Some(chunk) = chunks.next() else {
            return Ok(candidates);
        };
        let chunk = chunk?;
        tracing::trace!(%chunk, candidates = candidates.len(), "applying path chunk");
        candidates = match chunk {
            Chunk::Empty => return Ok(candidates),
            Chunk::Dot => continue,
            Chunk::Index(literal) => {
                let index = literal
                    .parse::<usize>()
                    .map_err(|source| QueryError::IndexParse { literal, source })?;
                eval_index(candidates, index)
            }
            Chunk::Member(name) => eval_member(candidates, &name),
            Chunk::Star => eval_star(candidates),
            Chunk::Brace(expression) => eval_brace(candidates, &expression)?,
            Chunk::Function(name) => functions::apply(candidates, &name)?,
        };
    }
}

/// Keeps the part of a candidate that `pick` selects, dropping the
/// candidate when nothing is selected.
fn select<'a, F>(candidate: Cow<'a, Value>, pick: F) -> Option<Cow<'a, Value>>
where
    F: for<'v> Fn(&'v Value) -> Option<&'v Value>,
{
    match candidate {
        Cow::Borrowed(value) => pick(value).map(Cow::Borrowed),
        Cow::Owned(value) => pick(&value).cloned().map(Cow::Owned),
    }
}

/// Splits a collection into its elements (sequence items or mapping
/// values). Scalars are handed back unchanged as the error.
pub(crate) fn children(candidate: Cow<'_, Value>) -> Result<Candidates<'_>, Cow<'_, Value>> {
    match candidate {
        Cow::Borrowed(Value::Sequence(items)) => Ok(items.iter().map(Cow::Borrowed).collect()),
        Cow::Borrowed(Value::Mapping(map)) => Ok(map.values().map(Cow::Borrowed).collect()),
        Cow::Owned(Value::Sequence(items)) => Ok(items.into_iter().map(Cow::Owned).collect()),
        Cow::Owned(Value::Mapping(map)) => Ok(map.into_values().map(Cow::Owned).collect()),
        scalar => Err(scalar),
    }
}

/// Sequence element `index`, or the mapping entry keyed by the index's
/// decimal text.
fn eval_index(candidates: Candidates<'_>, index: usize) -> Candidates<'_> {
    let key = index.to_string();
    candidates
        .into_iter()
        .filter_map(|candidate| {
            select(candidate, |value| match value {
                Value::Sequence(items) => items.get(index),
                Value::Mapping(map) => map.get(key.as_str()),
                _ => None,
            })
        })
        .collect()
}

fn eval_member<'a>(candidates: Candidates<'a>, name: &str) -> Candidates<'a> {
    candidates
        .into_iter()
        .filter_map(|candidate| select(candidate, |value| value.get(name)))
        .collect()
}

/// Expands every collection one level; scalars are dropped.
fn eval_star(candidates: Candidates<'_>) -> Candidates<'_> {
    candidates
        .into_iter()
        .filter_map(|candidate| children(candidate).ok())
        .flatten()
        .collect()
}

/// A parsed `left-path <op> literal` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub path: String,
    pub operator: Operator,
    pub literal: String,
}

impl Predicate {
    pub fn parse(expression: &str) -> Result<Self, QueryError> {
        let syntax_error = || QueryError::PredicateSyntax {
            expression: expression.to_string(),
        };
        let captures = PREDICATE.captures(expression).ok_or_else(syntax_error)?;
        let operator = Operator::parse(&captures[2]).ok_or_else(syntax_error)?;
        Ok(Predicate {
            path: captures[1].trim().to_string(),
            operator,
            literal: captures[3].trim().to_string(),
        })
    }

    /// True when any value `path` selects from `element` satisfies the
    /// comparison.
    fn matches(&self, element: &Value) -> Result<bool, QueryError> {
        let hits = run(vec![Cow::Borrowed(element)], &self.path)?;
        Ok(hits
            .iter()
            .any(|hit| compare_with(hit, &self.literal, self.operator)))
    }
}

/// Keeps the sub-elements of each collection candidate for which the
/// predicate holds. A sub-element is kept at most once.
fn eval_brace<'a>(candidates: Candidates<'a>, expression: &str) -> Result<Candidates<'a>, QueryError> {
    let predicate = Predicate::parse(expression)?;
    tracing::trace!(
        path = %predicate.path,
        operator = predicate.operator.as_str(),
        literal = %predicate.literal,
        "filtering with predicate"
    );

    let mut out = Vec::new();
    for candidate in candidates {
        let Ok(elements) = children(candidate) else {
            continue;
        };
        for element in elements {
            let keep = predicate
                .matches(&element)
                .map_err(|source| QueryError::Predicate {
                    expression: expression.to_string(),
                    path: predicate.path.clone(),
                    source: Box::new(source),
                })?;
            if keep {
                out.push(element);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_json;

    fn doc(json: &str) -> Value {
        parse_json(json).unwrap()
    }

    fn eval(value: &Value, path: &str) -> Vec<Value> {
        Evaluator::new(value).evaluate(path).unwrap()
    }

    #[test]
    fn test_predicate_parse() {
        let predicate = Predicate::parse(r#" zip_code == "90210" "#).unwrap();
        assert_eq!(predicate.path, "zip_code");
        assert_eq!(predicate.operator, Operator::Eq);
        assert_eq!(predicate.literal, r#""90210""#);
    }

    #[test]
    fn test_predicate_parse_prefers_two_char_operator() {
        let predicate = Predicate::parse("a<=3").unwrap();
        assert_eq!(predicate.operator, Operator::Le);
        assert_eq!(predicate.literal, "3");
        let predicate = Predicate::parse("a>=3").unwrap();
        assert_eq!(predicate.operator, Operator::Ge);
    }

    #[test]
    fn test_predicate_parse_first_operator_wins() {
        let predicate = Predicate::parse(r#"a != "x<y""#).unwrap();
        assert_eq!(predicate.path, "a");
        assert_eq!(predicate.operator, Operator::Ne);
        assert_eq!(predicate.literal, r#""x<y""#);
    }

    #[test]
    fn test_predicate_parse_without_operator() {
        let err = Predicate::parse("name = 3").unwrap_err();
        assert!(matches!(err, QueryError::PredicateSyntax { .. }));
    }

    #[test]
    fn test_index_on_sequence_and_mapping() {
        let value = doc(r#"[["a", "b"], {"1": "one"}, {"x": 1}, "scalar", ["only"]]"#);
        assert_eq!(
            eval(&value, "[*][1]"),
            vec![Value::from("b"), Value::from("one")]
        );
    }

    #[test]
    fn test_member_drops_non_mappings() {
        let value = doc(r#"[{"name": "a"}, {"other": 1}, 3, null, {"name": null}]"#);
        assert_eq!(eval(&value, "[*].name"), vec![Value::from("a"), Value::Null]);
    }

    #[test]
    fn test_star_drops_scalars() {
        let value = doc(r#"{"a": [1, 2], "b": {"c": 3}, "d": "scalar"}"#);
        assert_eq!(
            eval(&value, "[*][*]"),
            vec![Value::from(1_i64), Value::from(2_i64), Value::from(3_i64)]
        );
    }

    #[test]
    fn test_brace_ignores_scalar_candidates() {
        let value = doc(r#"{"a": 5}"#);
        assert!(eval(&value, "a[. > 1]").is_empty());
    }

    #[test]
    fn test_brace_keeps_element_once() {
        let value = doc(r#"[{"tags": ["x", "x", "y"]}, {"tags": ["z"]}]"#);
        let results = eval(&value, r#"[tags[*] == "x"]"#);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0], doc(r#"{"tags": ["x", "x", "y"]}"#));
    }

    #[test]
    fn test_brace_over_mapping_values() {
        let value = doc(r#"{"alice": {"age": 30}, "bob": {"age": 12}}"#);
        assert_eq!(eval(&value, "[age >= 18]"), vec![doc(r#"{"age": 30}"#)]);
    }

    #[test]
    fn test_brace_inner_error_is_wrapped() {
        let value = doc(r#"[{"a": 1}]"#);
        let err = Evaluator::new(&value)
            .evaluate("[a.nope() == 1]")
            .unwrap_err();
        match &err {
            QueryError::Predicate { path, .. } => assert_eq!(path, "a.nope()"),
            other => panic!("Expected predicate error, got {:?}", other),
        }
        assert!(matches!(err.root_cause(), QueryError::UnknownFunction { .. }));
    }

    #[test]
    fn test_brace_on_owned_candidates() {
        let value = doc(r#"{"raw": "[1, 5, 9]"}"#);
        assert_eq!(
            eval(&value, "raw.jsoneval()[. > 4]"),
            vec![Value::from(5_i64), Value::from(9_i64)]
        );
    }

    #[test]
    fn test_index_overflow_is_index_parse_error() {
        let value = doc("[]");
        let err = Evaluator::new(&value)
            .evaluate("[99999999999999999999999999]")
            .unwrap_err();
        assert!(matches!(err, QueryError::IndexParse { .. }));
    }

    #[test]
    fn test_empty_bracket_is_index_parse_error() {
        let value = doc("[1]");
        let err = Evaluator::new(&value).evaluate("[]").unwrap_err();
        assert!(matches!(err, QueryError::IndexParse { literal, .. } if literal.is_empty()));
    }

    #[test]
    fn test_empty_result_stops_early() {
        // the bogus function is never reached once nothing matches
        let value = doc(r#"{"a": 1}"#);
        assert!(eval(&value, "missing.bogus()").is_empty());
    }

    #[test]
    fn test_nested_predicate_in_left_path_splits_at_first_operator() {
        // the split happens at the inner `==`, leaving `t[.` as the left path
        let value = doc(r#"{"l": [{"t": ["x"]}]}"#);
        let err = Evaluator::new(&value)
            .evaluate(r#"l[t[. == "x"].length() == 1]"#)
            .unwrap_err();
        match &err {
            QueryError::Predicate { path, .. } => assert_eq!(path, "t[."),
            other => panic!("Expected predicate error, got {:?}", other),
        }
        assert!(matches!(err.root_cause(), QueryError::Scan { .. }));
    }

    #[test]
    fn test_evaluate_chunks_matches_path() {
        let value = doc(r#"{"a": [{"b": 1}, {"b": 2}]}"#);
        let chunks = Scanner::tokenize("a[*].b").unwrap();
        assert_eq!(
            Evaluator::new(&value).evaluate_chunks(&chunks).unwrap(),
            eval(&value, "a[*].b")
        );
    }

    #[test]
    fn test_evaluate_chunks_stops_on_empty_set() {
        let value = doc(r#"{"a": 1}"#);
        let chunks = Scanner::tokenize("missing.bogus()").unwrap();
        assert!(Evaluator::new(&value).evaluate_chunks(&chunks).unwrap().is_empty());
    }
}
