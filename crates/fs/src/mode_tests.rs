use super::*;

#[test]
fn rwx_string_renders_common_modes() {
    let cases: &[(u32, &str)] = &[
        (0o755, "rwxr-xr-x"),
        (0o644, "rw-r--r--"),
        (0o600, "rw-------"),
        (0o000, "---------"),
        (0o777, "rwxrwxrwx"),
        (0o100644, "rw-r--r--"),
        (0o041777, "rwxrwxrwx"),
        (0o4750, "rwxr-x---"),
    ];

    for (mode, expected) in cases {
        let got = Permissions::from_mode(*mode).to_rwx_string();
        assert_eq!(got, *expected, "mode {:o}", mode);
    }
}

#[test]
fn from_mode_drops_type_bits_keeps_special_bits() {
    let perms = Permissions::from_mode(S_IFREG | 0o4755);
    assert!(perms.contains(Permissions::SET_UID));
    assert!(!perms.contains(Permissions::STICKY));
    assert_eq!(perms.bits(), 0o4755);
}

#[cfg(unix)]
#[test]
fn raw_mode_reports_type_bits() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().expect("create temp dir");
    let file = tmp.path().join("f");
    std::fs::write(&file, b"x").expect("write file");
    std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o640)).expect("chmod");

    let meta = std::fs::symlink_metadata(&file).expect("lstat");
    let mode = raw_mode(&meta);
    assert_eq!(mode & S_IFMT, S_IFREG);
    assert_eq!(mode & 0o777, 0o640);

    let dir_meta = std::fs::symlink_metadata(tmp.path()).expect("lstat dir");
    assert_eq!(raw_mode(&dir_meta) & S_IFMT, S_IFDIR);
}
