use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use secutils_fs::{EntryKind, FileRecord, InspectError, inspect};
use secutils_runtime::TEXT_SNIFF_LEN;
use serde::Serialize;
use thiserror::Error;

use crate::extract::{Indicator, extract};

#[derive(Debug, Error)]
pub enum IocError {
    #[error(transparent)]
    Inspect(#[from] InspectError),

    #[error("{}: not a regular file ({})", .path.display(), .kind.as_str())]
    NotAFile { path: PathBuf, kind: EntryKind },

    #[error("{}: binary content, only text files are scanned", .path.display())]
    Binary { path: PathBuf },

    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Indicators found in one file, with the file's fingerprint for provenance.
#[derive(Debug, Clone, Serialize)]
pub struct IocReport {
    pub record: FileRecord,
    pub indicators: Vec<Indicator>,
}

/// Inspect `path` and extract indicators from its text content.
pub fn scan_file(path: impl AsRef<Path>) -> Result<IocReport, IocError> {
    let record = inspect(path.as_ref())?;
    scan_record(record)
}

/// Extract indicators from a file that has already been inspected.
pub fn scan_record(record: FileRecord) -> Result<IocReport, IocError> {
    let path = record.absolute_path().to_path_buf();

    if record.kind() != EntryKind::File {
        return Err(IocError::NotAFile {
            path,
            kind: record.kind(),
        });
    }

    let bytes = fs::read(&path).map_err(|source| IocError::Read {
        path: path.clone(),
        source,
    })?;

    if looks_binary(&bytes) {
        return Err(IocError::Binary { path });
    }

    let indicators = extract(&String::from_utf8_lossy(&bytes));
    debug!("[ioc] {}: {} indicators", path.display(), indicators.len());

    Ok(IocReport { record, indicators })
}

/// A NUL byte near the start marks the content as binary.
pub fn looks_binary(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(TEXT_SNIFF_LEN)];
    head.contains(&0)
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
