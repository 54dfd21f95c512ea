//! Document loading.
//!
//! This module reads a structured document from a file or stdin, transparently
//! decompresses gzip input, decides between JSON and YAML and decodes the
//! text into a [`Value`].

use super::detect::{detect_format, InputFormat};
use crate::document::node::Value;
use crate::document::parser::{parse_json, parse_yaml};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Loads a document from `input`, where `-` means stdin.
///
/// `format` forces the first decoder to try; `None` detects it from the
/// content.
pub fn load_input(input: &str, format: Option<InputFormat>) -> Result<Value> {
    if input == "-" {
        load_document_from_stdin(format)
    } else {
        load_document(input, format)
    }
}

/// Loads and decodes a document file.
///
/// Files are decompressed when they carry a `.gz` extension or start with
/// the gzip magic bytes.
///
/// # Examples
///
/// ```no_run
/// use stool::file::loader::load_document;
///
/// let doc = load_document("config.yaml", None).unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be read
/// - The content is neither valid UTF-8 nor valid gzip
/// - The format cannot be detected
/// - Neither the JSON nor the YAML decoder accepts the content
pub fn load_document<P: AsRef<Path>>(path: P, format: Option<InputFormat>) -> Result<Value> {
    let path = path.as_ref();
    let name = path.display().to_string();

    let bytes = fs::read(path).with_context(|| format!("could not open {:?}", name))?;
    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped || bytes.starts_with(&GZIP_MAGIC) {
        decompress_gzip_bytes(&bytes).with_context(|| format!("could not read {:?}", name))?
    } else {
        String::from_utf8(bytes).with_context(|| format!("{:?} is not valid UTF-8", name))?
    };

    decode(&content, format, &name)
}

/// Loads and decodes a document from standard input.
///
/// Gzip input is recognized by its magic bytes.
pub fn load_document_from_stdin(format: Option<InputFormat>) -> Result<Value> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let content = if buffer.starts_with(&GZIP_MAGIC) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")?
    };

    decode(&content, format, "<stdin>")
}

/// Decodes `content`, trying `format` (or the detected format) first and
/// the other format second.
///
/// `source` names the input in log lines and error messages.
pub fn decode(content: &str, format: Option<InputFormat>, source: &str) -> Result<Value> {
    let first = match format {
        Some(format) => format,
        None => detect_format(content)
            .with_context(|| format!("could not determine format of {:?}", source))?,
    };
    tracing::debug!(source, format = %first, "decoding document");

    for candidate in [first, first.other()] {
        match decode_as(content, candidate) {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(source, format = %candidate, "unable to parse: {}", err);
            }
        }
    }

    anyhow::bail!("no decoders were able to parse {:?}", source)
}

fn decode_as(content: &str, format: InputFormat) -> Result<Value> {
    match format {
        InputFormat::Json => Ok(parse_json(content)?),
        InputFormat::Yaml => Ok(parse_yaml(content)?),
    }
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are not valid gzip format
/// - The decompressed content is not valid UTF-8
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzip data - input may be corrupted")?;
    Ok(content)
}
