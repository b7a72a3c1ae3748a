//! Owner and group principal names.
//!
//! On unix, ids come from `st_uid`/`st_gid` and names from the thread-safe
//! `getpwuid_r`/`getgrgid_r`. When a lookup fails the numeric id is used;
//! on platforms without ownership both fields are empty.

use std::fs::Metadata;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principals {
    pub owner: String,
    pub group: String,
}

/// Whether this platform reports file ownership at all.
pub const fn ownership_supported() -> bool {
    cfg!(unix)
}

#[cfg(unix)]
pub fn resolve_principals(meta: &Metadata) -> Principals {
    use std::os::unix::fs::MetadataExt;

    let (uid, gid) = (meta.uid(), meta.gid());
    Principals {
        owner: user_name(uid).unwrap_or_else(|| uid.to_string()),
        group: group_name(gid).unwrap_or_else(|| gid.to_string()),
    }
}

#[cfg(not(unix))]
pub fn resolve_principals(_meta: &Metadata) -> Principals {
    Principals {
        owner: String::new(),
        group: String::new(),
    }
}

#[cfg(unix)]
const MAX_LOOKUP_BUF: usize = 1 << 20;

/// Resolve a UID to a user name via `getpwuid_r`.
#[cfg(unix)]
pub fn user_name(uid: u32) -> Option<String> {
    let mut buf = vec![0u8; 1024];
    loop {
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();

        let ret = unsafe {
            libc::getpwuid_r(
                uid,
                &mut pwd,
                buf.as_mut_ptr() as *mut libc::c_char,
                buf.len(),
                &mut result,
            )
        };

        if ret == libc::ERANGE && buf.len() < MAX_LOOKUP_BUF {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if ret != 0 || result.is_null() {
            log::debug!("[owner] no passwd entry for uid {uid} (ret {ret})");
            return None;
        }

        return non_empty(unsafe { std::ffi::CStr::from_ptr(pwd.pw_name) });
    }
}

/// Resolve a GID to a group name via `getgrgid_r`.
#[cfg(unix)]
pub fn group_name(gid: u32) -> Option<String> {
    let mut buf = vec![0u8; 1024];
    loop {
        let mut grp: libc::group = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::group = std::ptr::null_mut();

        let ret = unsafe {
            libc::getgrgid_r(
                gid,
                &mut grp,
                buf.as_mut_ptr() as *mut libc::c_char,
                buf.len(),
                &mut result,
            )
        };

        if ret == libc::ERANGE && buf.len() < MAX_LOOKUP_BUF {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if ret != 0 || result.is_null() {
            log::debug!("[owner] no group entry for gid {gid} (ret {ret})");
            return None;
        }

        return non_empty(unsafe { std::ffi::CStr::from_ptr(grp.gr_name) });
    }
}

#[cfg(unix)]
fn non_empty(name: &std::ffi::CStr) -> Option<String> {
    let name = name.to_string_lossy();
    if name.is_empty() {
        None
    } else {
        Some(name.into_owned())
    }
}
