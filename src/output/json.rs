//! JSON export of run results
//!
//! Results go to stdout by default so the binary can be piped; a path
//! redirects them to a file instead.

use crate::HarvestError;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes `value` as pretty-printed JSON to `path`, or to stdout when `None`
///
/// # Returns
///
/// * `Ok(())` - The JSON was written and flushed
/// * `Err(HarvestError)` - Serialization or I/O failed
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<(), HarvestError> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            write_json_to(value, writer)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => write_json_to(value, io::stdout().lock())?,
    }
    Ok(())
}

/// Writes `value` as pretty-printed JSON followed by a newline
pub fn write_json_to<T: Serialize, W: Write>(
    value: &T,
    mut writer: W,
) -> Result<(), HarvestError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
