use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::Path;

/// Renders a `ls -l` style permission string, e.g. `drwxr-xr-x`.
pub fn format_mode(metadata: &Metadata) -> String {
    let file_type = metadata.file_type();
    let kind = if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else {
        '-'
    };

    let mut mode = String::with_capacity(10);
    mode.push(kind);
    mode.push_str(&permission_bits(metadata));
    mode
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let bits = metadata.permissions().mode();
    let flags = ['r', 'w', 'x'];
    (0..9)
        .map(|i| {
            if bits & (0o400 >> i) != 0 {
                flags[i % 3]
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> String {
    if metadata.permissions().readonly() {
        "r--r--r--".to_string()
    } else {
        "rw-rw-rw-".to_string()
    }
}

/// Whether two paths name the same file, through symlinks and hard links alike.
#[cfg(unix)]
pub fn same_file(_a: &Path, a_meta: &Metadata, _b: &Path, b_meta: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    a_meta.dev() == b_meta.dev() && a_meta.ino() == b_meta.ino()
}

#[cfg(not(unix))]
pub fn same_file(a: &Path, _a_meta: &Metadata, b: &Path, _b_meta: &Metadata) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The last component of a client supplied name, `None` for names like `..` or `/`.
pub fn file_name_of(name: &str) -> Option<&OsStr> {
    Path::new(name).file_name()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("report.txt"), Some(OsStr::new("report.txt")));
        assert_eq!(file_name_of("/home/me/report.txt"), Some(OsStr::new("report.txt")));
        assert_eq!(file_name_of("../report.txt"), Some(OsStr::new("report.txt")));
        assert_eq!(file_name_of(".."), None);
        assert_eq!(file_name_of("/"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_same_file_sees_through_links() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f");
        let other = dir.path().join("g");
        let alias = dir.path().join("alias");
        let hard = dir.path().join("hard");
        std::fs::write(&file, b"x").unwrap();
        std::fs::write(&other, b"x").unwrap();
        std::os::unix::fs::symlink(&file, &alias).unwrap();
        std::fs::hard_link(&file, &hard).unwrap();

        let meta = |p: &Path| std::fs::metadata(p).unwrap();
        assert!(same_file(&file, &meta(&file), &alias, &meta(&alias)));
        assert!(same_file(&file, &meta(&file), &hard, &meta(&hard)));
        assert!(!same_file(&file, &meta(&file), &other, &meta(&other)));
    }

    #[cfg(unix)]
    #[test]
    fn test_format_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, b"x").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o640)).unwrap();
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(format_mode(&std::fs::metadata(&file).unwrap()), "-rw-r-----");
        assert_eq!(format_mode(&std::fs::metadata(dir.path()).unwrap()), "drwxr-xr-x");
    }
}
