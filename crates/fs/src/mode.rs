use std::fs::Metadata;

use bitflags::bitflags;

bitflags! {
    /// POSIX permission bits (the low 12 bits of `st_mode`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        const SET_UID     = 0o4000;
        const SET_GID     = 0o2000;
        const STICKY      = 0o1000;
        const OWNER_READ  = 0o0400;
        const OWNER_WRITE = 0o0200;
        const OWNER_EXEC  = 0o0100;
        const GROUP_READ  = 0o0040;
        const GROUP_WRITE = 0o0020;
        const GROUP_EXEC  = 0o0010;
        const OTHER_READ  = 0o0004;
        const OTHER_WRITE = 0o0002;
        const OTHER_EXEC  = 0o0001;
    }
}

/// File-type bits of `st_mode`.
pub const S_IFMT: u32 = 0o170000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFLNK: u32 = 0o120000;

impl Permissions {
    pub fn from_mode(mode: u32) -> Self {
        Self::from_bits_truncate(mode)
    }

    /// `ls`-style rendering of the nine rwx bits, e.g. `rwxr-xr-x`.
    pub fn to_rwx_string(self) -> String {
        const SLOTS: [(Permissions, char); 9] = [
            (Permissions::OWNER_READ, 'r'),
            (Permissions::OWNER_WRITE, 'w'),
            (Permissions::OWNER_EXEC, 'x'),
            (Permissions::GROUP_READ, 'r'),
            (Permissions::GROUP_WRITE, 'w'),
            (Permissions::GROUP_EXEC, 'x'),
            (Permissions::OTHER_READ, 'r'),
            (Permissions::OTHER_WRITE, 'w'),
            (Permissions::OTHER_EXEC, 'x'),
        ];

        SLOTS
            .iter()
            .map(|(flag, c)| if self.contains(*flag) { *c } else { '-' })
            .collect()
    }
}

/// Raw `st_mode` of already-fetched (non-following) metadata.
#[cfg(unix)]
pub fn raw_mode(meta: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

/// Synthesized mode for platforms without POSIX bits: the type bits from the
/// file type and `rw` or `r` for everyone depending on the read-only flag.
#[cfg(not(unix))]
pub fn raw_mode(meta: &Metadata) -> u32 {
    let ft = meta.file_type();
    let kind = if ft.is_symlink() {
        S_IFLNK
    } else if ft.is_dir() {
        S_IFDIR
    } else if ft.is_file() {
        S_IFREG
    } else {
        0
    };
    let mut perm = if meta.permissions().readonly() { 0o444 } else { 0o666 };
    if ft.is_dir() {
        perm |= 0o111;
    }
    kind | perm
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
