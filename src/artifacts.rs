use crate::error::Error;
use crate::model::CanonicalRecord;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Writes a record set as a pretty-printed JSON array, creating parent
/// directories as needed.
pub fn write_records(path: &Path, records: &[CanonicalRecord]) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads a record set previously written by `write_records` (or exported by
/// the `export` subcommand).
pub fn read_records(path: &Path) -> Result<Vec<CanonicalRecord>, Error> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
