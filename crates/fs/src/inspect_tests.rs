use super::*;

use crate::file_type::FileType;
use std::fs::{create_dir, write};

const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";
const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn canonical_tmp() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = fs::canonicalize(tmp.path()).expect("canonicalize temp dir");
    (tmp, root)
}

#[test]
fn empty_text_file_has_empty_input_digests() {
    let (_tmp, root) = canonical_tmp();
    let path = root.join("empty.txt");
    write(&path, b"").expect("write file");

    let rec = inspect(&path).expect("inspect empty.txt");

    assert_eq!(rec.name(), "empty.txt");
    assert_eq!(rec.size(), 0);
    assert_eq!(rec.kind(), EntryKind::File);
    assert!(!rec.is_dir());
    assert_eq!(rec.link_target(), None);
    assert_eq!(rec.absolute_path(), path);
    assert_eq!(rec.file_type().extension, ".txt");
    assert_eq!(rec.file_type().description, "Text File");
    assert_eq!(rec.md5(), Some(EMPTY_MD5));
    assert_eq!(rec.sha1(), Some(EMPTY_SHA1));
    assert_eq!(rec.sha256(), Some(EMPTY_SHA256));
}

#[test]
fn regular_file_digests_cover_exact_content() {
    let (_tmp, root) = canonical_tmp();
    let path = root.join("hello.bin");
    write(&path, b"hello world").expect("write file");

    let rec = inspect(&path).expect("inspect");

    assert_eq!(rec.size(), 11);
    assert_eq!(rec.md5(), Some("5eb63bbbe01eeed093cb22bb8f5acdc3"));
    assert_eq!(rec.sha1(), Some("2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"));
    assert_eq!(
        rec.sha256(),
        Some("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
    );
    assert!(rec.file_type().is_unknown());
}

#[test]
fn directory_has_no_digests_and_zero_size() {
    let (_tmp, root) = canonical_tmp();
    let dir = root.join("evidence.d");
    create_dir(&dir).expect("create dir");
    write(dir.join("inner.txt"), b"some content").expect("write inner");

    let rec = inspect(&dir).expect("inspect dir");

    assert!(rec.is_dir());
    assert_eq!(rec.kind(), EntryKind::Directory);
    assert_eq!(rec.size(), 0);
    assert_eq!(rec.digests(), None);
    assert_eq!(rec.md5(), None);
    assert_eq!(rec.link_target(), None);
    assert_eq!(*rec.file_type(), FileType::unknown());
}

#[test]
fn directory_named_like_a_known_type_is_still_classified() {
    let (_tmp, root) = canonical_tmp();
    let dir = root.join("backup.zip");
    create_dir(&dir).expect("create dir");

    let rec = inspect(&dir).expect("inspect dir");
    assert!(rec.is_dir());
    assert_eq!(rec.file_type().description, "ZIP Archive");
    assert_eq!(rec.digests(), None);
}

#[test]
fn missing_path_is_path_not_found_at_stat() {
    let (_tmp, root) = canonical_tmp();
    let path = root.join("does-not-exist.pdf");

    let err = inspect(&path).expect_err("missing path");

    assert!(matches!(err, InspectError::PathNotFound { .. }), "got {err:?}");
    assert_eq!(err.stage(), Stage::Stat);
    let msg = err.to_string();
    assert!(msg.starts_with("stat "), "message {msg}");
    assert!(msg.contains("does-not-exist.pdf"), "message {msg}");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn inspecting_twice_yields_identical_records() {
    let (_tmp, root) = canonical_tmp();
    let path = root.join("stable.log");
    write(&path, b"line one\nline two\n").expect("write file");

    let first = inspect(&path).expect("first inspect");
    let second = inspect(&path).expect("second inspect");

    assert_eq!(first, second);
}

#[test]
fn final_link_resolution_is_detected_from_the_raw_path() {
    let cases = [
        ("alias/", true),
        ("alias/.", true),
        ("a/b//", true),
        ("/", true),
        ("alias", false),
        ("alias.", false),
        (".", false),
        ("..", false),
        ("", false),
    ];

    for (input, expected) in cases {
        assert_eq!(follows_final_link(Path::new(input)), expected, "{input:?}");
    }
}

#[test]
fn dot_dot_components_are_canonicalized() {
    let (_tmp, root) = canonical_tmp();
    create_dir(root.join("sub")).expect("create sub");
    write(root.join("file.csv"), b"a,b\n").expect("write file");

    let rec = inspect(root.join("sub").join("..").join("file.csv")).expect("inspect");
    assert_eq!(rec.absolute_path(), root.join("file.csv"));
    assert_eq!(rec.name(), "file.csv");

    let rec = inspect(root.join("sub").join("..")).expect("inspect dir");
    assert_eq!(rec.absolute_path(), root);
}

#[test]
fn modified_at_matches_file_mtime() {
    let (_tmp, root) = canonical_tmp();
    let path = root.join("m.txt");
    write(&path, b"x").expect("write file");

    let mtime = fs::metadata(&path).expect("stat").modified().expect("mtime");
    let rec = inspect(&path).expect("inspect");

    assert_eq!(rec.modified_at(), to_local(mtime));
    assert_eq!(SystemTime::from(rec.modified_at()), mtime);
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::{
        ffi::CString,
        os::unix::{ffi::OsStrExt, fs::PermissionsExt, fs::symlink},
    };

    #[test]
    fn permissions_and_mode_reflect_chmod() {
        let (_tmp, root) = canonical_tmp();
        let path = root.join("run.sh");
        write(&path, b"#!/bin/sh\n").expect("write file");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o754)).expect("chmod");

        let rec = inspect(&path).expect("inspect");

        assert_eq!(rec.permissions(), "rwxr-xr--");
        assert_eq!(rec.mode() & 0o7777, 0o754);
        assert_eq!(rec.mode() & crate::mode::S_IFMT, crate::mode::S_IFREG);
        assert_eq!(rec.file_type().description, "Shell Script");
        assert!(!rec.owner().is_empty());
        assert!(!rec.group().is_empty());
    }

    #[test]
    fn symlink_to_file_records_literal_target_without_digests() {
        let (_tmp, root) = canonical_tmp();
        write(root.join("target.pdf"), b"%PDF-1.7").expect("write target");
        let link = root.join("link.txt");
        symlink("target.pdf", &link).expect("create symlink");

        let rec = inspect(&link).expect("inspect link");

        assert_eq!(rec.kind(), EntryKind::Symlink);
        assert!(rec.is_symlink());
        assert_eq!(rec.link_target(), Some(Path::new("target.pdf")));
        assert_eq!(rec.digests(), None);
        assert_eq!(rec.absolute_path(), link);
        assert_eq!(rec.mode() & crate::mode::S_IFMT, crate::mode::S_IFLNK);
        // Classification looks at the link's own name.
        assert_eq!(rec.file_type().description, "Text File");
        // Size of the link itself, i.e. the target string.
        assert_eq!(rec.size(), "target.pdf".len() as u64);
    }

    #[test]
    fn broken_symlink_still_inspects() {
        let (_tmp, root) = canonical_tmp();
        let link = root.join("dangling");
        symlink(root.join("gone.bin"), &link).expect("create symlink");

        let rec = inspect(&link).expect("broken symlink must inspect");

        assert_eq!(rec.kind(), EntryKind::Symlink);
        assert_eq!(rec.link_target(), Some(root.join("gone.bin").as_path()));
        assert_eq!(rec.digests(), None);
    }

    #[test]
    fn chained_symlinks_resolve_one_hop_only() {
        let (_tmp, root) = canonical_tmp();
        write(root.join("final.txt"), b"data").expect("write");
        symlink("final.txt", root.join("hop2")).expect("hop2");
        symlink("hop2", root.join("hop1")).expect("hop1");

        let rec = inspect(root.join("hop1")).expect("inspect");
        assert_eq!(rec.link_target(), Some(Path::new("hop2")));
    }

    #[test]
    fn symlinked_parent_is_resolved_but_final_link_is_kept() {
        let (_tmp, root) = canonical_tmp();
        create_dir(root.join("real")).expect("create real");
        write(root.join("real").join("a.json"), b"{}").expect("write");
        symlink("real", root.join("alias")).expect("alias");

        let rec = inspect(root.join("alias").join("a.json")).expect("inspect through alias");
        assert_eq!(rec.absolute_path(), root.join("real").join("a.json"));
        assert!(rec.digests().is_some());

        let rec = inspect(root.join("alias")).expect("inspect alias");
        assert_eq!(rec.absolute_path(), root.join("alias"));
        assert!(rec.is_symlink());
        assert!(!rec.is_dir());
    }

    #[test]
    fn trailing_slash_on_symlinked_directory_reports_the_target() {
        let (_tmp, root) = canonical_tmp();
        create_dir(root.join("real.d")).expect("create real");
        symlink("real.d", root.join("alias")).expect("alias");

        for input in [root.join("alias/"), root.join("alias/.")] {
            let rec = inspect(&input).expect("inspect through trailing slash");

            assert_eq!(rec.kind(), EntryKind::Directory, "{input:?}");
            assert_eq!(rec.link_target(), None);
            assert_eq!(rec.absolute_path(), root.join("real.d"));
            assert_eq!(rec.name(), "real.d");
        }

        let rec = inspect(root.join("alias")).expect("inspect link itself");
        assert!(rec.is_symlink());
        assert_eq!(rec.absolute_path(), root.join("alias"));
    }

    #[test]
    fn fifo_is_other_and_never_opened() {
        let (_tmp, root) = canonical_tmp();
        let path = root.join("pipe");
        let c_path = CString::new(path.as_os_str().as_bytes()).expect("c path");
        let ret = unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) };
        assert_eq!(ret, 0, "mkfifo failed");

        let rec = inspect(&path).expect("inspect fifo");

        assert_eq!(rec.kind(), EntryKind::Other);
        assert_eq!(rec.digests(), None);
        assert_eq!(rec.link_target(), None);
        assert!(!rec.is_dir());
    }

    #[test]
    fn unreadable_file_fails_at_read_stage() {
        // root bypasses permission bits
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let (_tmp, root) = canonical_tmp();
        let path = root.join("secret.key");
        write(&path, b"-----BEGIN KEY-----").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).expect("chmod");

        let err = inspect(&path).expect_err("unreadable");
        assert!(
            matches!(err, InspectError::PermissionDenied { stage: Stage::Read, .. }),
            "got {err:?}"
        );
        assert!(err.to_string().starts_with("read "));
    }
}
