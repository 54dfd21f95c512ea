//! stool - query and reformat structured files.
//!
//! The [`query`] module is the engine: it evaluates compact path expressions
//! against a decoded [`document::Value`]. The remaining modules load
//! documents, render results and hold user configuration for the command
//! line tool.

pub mod config;
pub mod document;
pub mod file;
pub mod query;
pub mod render;
