use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use md5::Md5;
use secutils_runtime::HASH_BUF_SIZE;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::{InspectError, Result, Stage};

/// Lowercase hex content digests of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digests {
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

/// Accumulates all three digests from a single pass over the bytes.
#[derive(Default)]
struct DigestSet {
    md5: Md5,
    sha1: Sha1,
    sha256: Sha256,
}

impl DigestSet {
    fn update(&mut self, chunk: &[u8]) {
        self.md5.update(chunk);
        self.sha1.update(chunk);
        self.sha256.update(chunk);
    }

    fn finalize(self) -> Digests {
        Digests {
            md5: hex::encode(self.md5.finalize()),
            sha1: hex::encode(self.sha1.finalize()),
            sha256: hex::encode(self.sha256.finalize()),
        }
    }
}

/// Read `reader` to the end once, feeding every chunk to all accumulators.
///
/// Nothing is returned unless the whole stream was read.
pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<Digests> {
    let mut set = DigestSet::default();
    let mut buf = vec![0u8; HASH_BUF_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        set.update(&buf[..n]);
    }

    Ok(set.finalize())
}

/// MD5, SHA-1 and SHA-256 of the file at `path`, from one open and one read.
pub fn compute_digests(path: &Path) -> Result<Digests> {
    let file = File::open(path).map_err(|e| InspectError::from_io(path, Stage::Read, e))?;
    digest_reader(file).map_err(|e| InspectError::from_io(path, Stage::Read, e))
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
