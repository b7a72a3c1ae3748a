use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::Path,
};

use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;

use crate::{
    error::{InspectError, Result, Stage},
    record::FileRecord,
};

/// Write `record` to `destination` as one pretty-printed JSON document,
/// replacing any existing file.
///
/// The document is written to a temporary file beside `destination` and
/// renamed over it, so a failed write leaves the previous content in place.
pub fn persist(record: &FileRecord, destination: impl AsRef<Path>) -> Result<()> {
    write_json(record, destination.as_ref())
}

/// Write many records as a single JSON array document.
pub fn persist_all(records: &[FileRecord], destination: impl AsRef<Path>) -> Result<()> {
    write_json(records, destination.as_ref())
}

/// Read back a record written by [`persist`].
pub fn load(source: impl AsRef<Path>) -> Result<FileRecord> {
    read_json(source.as_ref())
}

/// Read back records written by [`persist_all`].
pub fn load_all(source: impl AsRef<Path>) -> Result<Vec<FileRecord>> {
    read_json(source.as_ref())
}

fn write_json<T: Serialize + ?Sized>(value: &T, destination: &Path) -> Result<()> {
    let write_err = |e| InspectError::from_io(destination, Stage::Write, e);

    let mut body = serde_json::to_vec_pretty(value).map_err(|e| write_err(io::Error::from(e)))?;
    body.push(b'\n');

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&body).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(destination).map_err(|e| write_err(e.error))?;

    debug!("[persist] wrote {} ({} bytes)", destination.display(), body.len());
    Ok(())
}

fn read_json<T: DeserializeOwned>(source: &Path) -> Result<T> {
    let file = File::open(source).map_err(|e| InspectError::from_io(source, Stage::Read, e))?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        if e.is_io() {
            InspectError::from_io(source, Stage::Read, e.into())
        } else {
            InspectError::Decode {
                path: source.to_path_buf(),
                source: e,
            }
        }
    })
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
