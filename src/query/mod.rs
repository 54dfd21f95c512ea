//! Path queries over decoded documents.
//!
//! A path is a compact, dot-separated expression that selects sub-values of
//! a document. It is read one chunk at a time and every chunk transforms the
//! current result set.
//!
//! # Supported Syntax
//!
//! - `.` - Separator (a lone `.` selects the whole document)
//! - `name` or `['name']` / `["name"]` - Member of a mapping
//! - `0` or `[0]` - Element of a sequence, or the mapping entry keyed `"0"`
//! - `[*]` - All elements of a sequence or values of a mapping
//! - `[path <op> literal]` - Elements for which `path` yields a value
//!   satisfying the comparison (`<`, `<=`, `>`, `>=`, `==`, `!=`)
//! - `name()` - Built-in function, see [`functions::FUNCTION_NAMES`]
//!
//! # Examples
//!
//! ```
//! use stool::document::parser::parse_yaml;
//! use stool::document::Value;
//! use stool::query::evaluate;
//!
//! let doc = parse_yaml("contacts:\n  - name: Ann\n    zip: \"90210\"\n  - name: Bo\n    zip: \"10001\"\n").unwrap();
//! let names = evaluate(&doc, r#"contacts[zip == "90210"].name"#).unwrap();
//! assert_eq!(names, vec![Value::from("Ann")]);
//! ```

pub mod chunk;
pub mod compare;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod scanner;

pub use chunk::Chunk;
pub use error::QueryError;
pub use evaluator::Evaluator;
pub use scanner::Scanner;

use crate::document::node::Value;

/// Evaluates `path` against `document`.
///
/// The result set starts as `[document]`. Any error aborts the whole
/// evaluation; partial results are never returned.
pub fn evaluate(document: &Value, path: &str) -> Result<Vec<Value>, QueryError> {
    Evaluator::new(document).evaluate(path)
}

/// A path expression checked up front for scanner errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    path: String,
    chunks: Vec<Chunk>,
}

impl Query {
    /// Scans `path` once so malformed paths fail before any document is
    /// loaded.
    pub fn parse(path: &str) -> Result<Self, QueryError> {
        let chunks = Scanner::tokenize(path)?;
        Ok(Query {
            path: path.to_string(),
            chunks,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Evaluates the scanned chunks against `document` without rescanning
    /// the path.
    pub fn evaluate(&self, document: &Value) -> Result<Vec<Value>, QueryError> {
        Evaluator::new(document).evaluate_chunks(&self.chunks)
    }
}
