//! File I/O for structured documents.
//!
//! This module loads JSON or YAML documents from disk or stdin (optionally
//! gzip-compressed) and writes rendered results to stdout or a file.

pub mod detect;
pub mod loader;
pub mod saver;
