//! Forensic inspection of filesystem paths.
//!
//! [`inspect`] turns one path into an immutable [`FileRecord`]: identity,
//! ownership, mtime, one-hop symlink target, extension classification and
//! MD5/SHA-1/SHA-256 of regular files. [`inspect_tree`] runs it over a
//! directory tree on a worker pool.

mod digest;
mod error;
mod file_type;
mod inspect;
mod mode;
mod os_path;
mod owner;
mod persist;
mod record;
mod walker;

pub use digest::{Digests, compute_digests, digest_reader};
pub use error::{InspectError, Result, Stage};
pub use file_type::{
    FILE_EXTENSIONS, FileType, UNKNOWN_DESCRIPTION, UNKNOWN_EXTENSION, classify, describe,
    extension_of,
};
pub use inspect::inspect;
pub use mode::Permissions;
pub use owner::{Principals, ownership_supported, resolve_principals};
pub use persist::{load, load_all, persist, persist_all};
pub use record::{EntryKind, FileRecord};
pub use walker::{WalkSummary, inspect_tree};
