use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{digest::Digests, file_type::FileType, mode::Permissions};

/// What the non-following stat reported the entry to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Sockets, fifos, block and character devices.
    Other,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symlink",
            EntryKind::Other => "other",
        }
    }
}

/// Forensic fingerprint of one path, produced by [`crate::inspect`].
///
/// Fields are read-only once assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Final path component exactly as on disk. Non-UTF-8 names are kept as raw bytes.
    #[serde(with = "crate::os_path")]
    name: OsString,
    /// Byte length, 0 for directories. For symlinks the length of the link itself.
    size: u64,
    /// Raw mode bits including the file-type bits.
    mode: u32,
    /// `rwxr-xr-x` style rendering of the permission bits
    permissions: String,
    kind: EntryKind,
    modified_at: DateTime<FixedOffset>,
    is_dir: bool,
    owner: String,
    group: String,
    /// Literal one-hop target, only for symlinks
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::os_path::option"
    )]
    link_target: Option<PathBuf>,
    #[serde(with = "crate::os_path")]
    absolute_path: PathBuf,
    file_type: FileType,
    /// Only for regular, readable files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    digests: Option<Digests>,
}

/// Everything the assembler gathered, moved into the record in one step.
pub(crate) struct RecordParts {
    pub name: OsString,
    pub size: u64,
    pub mode: u32,
    pub kind: EntryKind,
    pub modified_at: DateTime<FixedOffset>,
    pub owner: String,
    pub group: String,
    pub link_target: Option<PathBuf>,
    pub absolute_path: PathBuf,
    pub file_type: FileType,
    pub digests: Option<Digests>,
}

impl FileRecord {
    pub(crate) fn assemble(parts: RecordParts) -> Self {
        let is_dir = parts.kind == EntryKind::Directory;
        debug_assert!(!(is_dir && parts.digests.is_some()));
        debug_assert_eq!(parts.kind == EntryKind::Symlink, parts.link_target.is_some());

        Self {
            name: parts.name,
            size: if is_dir { 0 } else { parts.size },
            mode: parts.mode,
            permissions: Permissions::from_mode(parts.mode).to_rwx_string(),
            kind: parts.kind,
            modified_at: parts.modified_at,
            is_dir,
            owner: parts.owner,
            group: parts.group,
            link_target: parts.link_target,
            absolute_path: parts.absolute_path,
            file_type: parts.file_type,
            digests: parts.digests,
        }
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn permissions(&self) -> &str {
        &self.permissions
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn modified_at(&self) -> DateTime<FixedOffset> {
        self.modified_at
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn link_target(&self) -> Option<&Path> {
        self.link_target.as_deref()
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    pub fn file_type(&self) -> &FileType {
        &self.file_type
    }

    pub fn digests(&self) -> Option<&Digests> {
        self.digests.as_ref()
    }

    pub fn md5(&self) -> Option<&str> {
        self.digests.as_ref().map(|d| d.md5.as_str())
    }

    pub fn sha1(&self) -> Option<&str> {
        self.digests.as_ref().map(|d| d.sha1.as_str())
    }

    pub fn sha256(&self) -> Option<&str> {
        self.digests.as_ref().map(|d| d.sha256.as_str())
    }
}
