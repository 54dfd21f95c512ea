//! Writing rendered output.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `data` to `output`, where `-` means stdout.
pub fn write_output(output: &str, data: &[u8]) -> Result<()> {
    if output == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data).context("Failed to write to stdout")?;
        stdout.flush().context("Failed to flush stdout")?;
        return Ok(());
    }

    let path = Path::new(output);
    let compress = path.to_string_lossy().ends_with(".gz");
    write_file_atomic(path, data, compress)
        .with_context(|| format!("could not write {:?}", output))
}

/// Writes data to a file atomically, optionally compressing with gzip.
///
/// The data goes to a uniquely named temporary file in the target's
/// directory and is then persisted over the target, so the target is never
/// left partially written. The temporary file is removed if anything fails.
///
/// # Errors
///
/// Returns an error if:
/// - Creating the temp file fails
/// - Writing or compressing fails
/// - Persisting the temp file fails
pub fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).context("Failed to create temp file")?;

    if compress {
        let mut encoder = GzEncoder::new(temp.as_file_mut(), Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        temp.write_all(data).context("Failed to write temp file")?;
    }
    temp.flush().context("Failed to flush temp file")?;

    temp.persist(path)
        .map_err(|err| err.error)
        .context("Failed to replace target file")?;

    Ok(())
}
