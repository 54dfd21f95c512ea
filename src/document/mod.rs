//! Document model: the generic value tree plus its JSON/YAML codecs.

pub mod node;
pub mod parser;
pub mod serialize;

pub use node::{Number, Value};
