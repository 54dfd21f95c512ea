//! Error types for path scanning and evaluation.

use std::num::ParseIntError;
use thiserror::Error;

/// Errors that abort a path evaluation.
///
/// None of these are recoverable: the evaluation that raised one returns no
/// results at all. Comparisons whose literal cannot be read are not errors;
/// they simply do not match.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The path text could not be split into chunks.
    #[error("malformed path at offset {position}: {message}")]
    Scan { position: usize, message: String },

    /// A chunk classified as an index did not parse as one.
    #[error("incorrectly interpreted {literal:?} as an index")]
    IndexParse {
        literal: String,
        #[source]
        source: ParseIntError,
    },

    /// Bracket content without a comparison operator.
    #[error("don't know how to interpret {expression:?}")]
    PredicateSyntax { expression: String },

    #[error("unknown function {name:?}")]
    UnknownFunction { name: String },

    #[error("could not marshal item {item} as {format}: {message}")]
    Serialization {
        item: usize,
        format: &'static str,
        message: String,
    },

    #[error("could not unmarshal result {item} as {format}: {message}")]
    Deserialization {
        item: usize,
        format: &'static str,
        message: String,
    },

    /// The left-hand path of a predicate failed on one of the sub-elements.
    #[error("could not evaluate {path:?} in expression {expression:?}")]
    Predicate {
        expression: String,
        path: String,
        #[source]
        source: Box<QueryError>,
    },
}

impl QueryError {
    pub(crate) fn scan(position: usize, message: impl Into<String>) -> Self {
        QueryError::Scan {
            position,
            message: message.into(),
        }
    }

    /// Returns the innermost error, skipping predicate context.
    pub fn root_cause(&self) -> &QueryError {
        match self {
            QueryError::Predicate { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
