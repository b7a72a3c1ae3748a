use std::{
    ffi::OsString,
    fs::{self, File, Metadata},
    io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, FixedOffset, Local};
use log::debug;

use crate::{
    digest::{Digests, digest_reader},
    error::{InspectError, Result, Stage},
    file_type::classify,
    mode::raw_mode,
    owner::resolve_principals,
    record::{EntryKind, FileRecord, RecordParts},
};

/// Inspect a single path and assemble its [`FileRecord`].
///
/// The top-level stat never follows symlinks: a link is reported as a link,
/// its target is read once and never followed, and no digests are computed
/// for it. Directories and special files are never opened. Any failure after
/// the stat aborts the whole inspection.
pub fn inspect(path: impl AsRef<Path>) -> Result<FileRecord> {
    let path = path.as_ref();
    debug!("[inspect] {}", path.display());

    let meta = fs::symlink_metadata(path).map_err(|e| InspectError::from_io(path, Stage::Stat, e))?;
    let kind = entry_kind(&meta);

    let absolute_path =
        canonical_path(path).map_err(|e| InspectError::from_io(path, Stage::Stat, e))?;
    let name = display_name(&absolute_path);
    let file_type = classify(&absolute_path);

    let principals = resolve_principals(&meta);

    let link_target = match kind {
        EntryKind::Symlink => Some(
            fs::read_link(path).map_err(|e| InspectError::from_io(path, Stage::Stat, e))?,
        ),
        _ => None,
    };

    let digests = match kind {
        EntryKind::File => Some(digest_regular_file(path)?),
        _ => None,
    };

    Ok(FileRecord::assemble(RecordParts {
        name,
        size: meta.len(),
        mode: raw_mode(&meta),
        kind,
        modified_at: modified_at(&meta),
        owner: principals.owner,
        group: principals.group,
        link_target,
        absolute_path,
        file_type,
        digests,
    }))
}

fn entry_kind(meta: &Metadata) -> EntryKind {
    let ft = meta.file_type();
    if ft.is_symlink() {
        EntryKind::Symlink
    } else if ft.is_dir() {
        EntryKind::Directory
    } else if ft.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

/// Absolute form of `path` with its parent directory canonicalized.
///
/// The final component is kept as given so a symlink is never resolved.
/// Paths ending in `..` or naming the root are canonicalized whole, as are
/// paths the OS resolves through a final link (`alias/`, `alias/.`) so the
/// path agrees with the metadata the stat returned.
fn canonical_path(path: &Path) -> io::Result<PathBuf> {
    if follows_final_link(path) {
        return fs::canonicalize(path);
    }

    let abs = std::path::absolute(path)?;

    match (abs.parent(), abs.file_name()) {
        (Some(parent), Some(name)) => match fs::canonicalize(parent) {
            Ok(parent) => Ok(parent.join(name)),
            Err(e) => {
                debug!("[inspect] canonicalize({:?}) failed, keeping {:?}: {e}", parent, abs);
                Ok(abs)
            }
        },
        _ => fs::canonicalize(&abs),
    }
}

/// Whether the stat of `path` resolves a symlink in its final component.
fn follows_final_link(path: &Path) -> bool {
    let raw = path.as_os_str().as_encoded_bytes();
    let is_sep = |b: u8| std::path::is_separator(b as char);

    match raw {
        [.., last] if is_sep(*last) => true,
        [.., sep, b'.'] => is_sep(*sep),
        _ => false,
    }
}

fn display_name(absolute_path: &Path) -> OsString {
    match absolute_path.file_name() {
        Some(name) => name.to_os_string(),
        None => absolute_path.as_os_str().to_os_string(),
    }
}

fn modified_at(meta: &Metadata) -> DateTime<FixedOffset> {
    let mtime = meta.modified().unwrap_or_else(|e| {
        debug!("[inspect] mtime unavailable, using epoch: {e}");
        UNIX_EPOCH
    });
    to_local(mtime)
}

fn to_local(t: SystemTime) -> DateTime<FixedOffset> {
    DateTime::<Local>::from(t).fixed_offset()
}

/// Digest a file that the top-level stat reported as regular.
///
/// On unix the open refuses to follow a symlink swapped in since the stat.
fn digest_regular_file(path: &Path) -> Result<Digests> {
    let file = open_no_follow(path).map_err(|e| InspectError::from_io(path, Stage::Read, e))?;
    digest_reader(file).map_err(|e| InspectError::from_io(path, Stage::Read, e))
}

#[cfg(unix)]
fn open_no_follow(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NOFOLLOW)
        .open(path)
}

#[cfg(not(unix))]
fn open_no_follow(path: &Path) -> io::Result<File> {
    File::open(path)
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
