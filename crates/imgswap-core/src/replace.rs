use crate::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Overwrite `path` with `bytes` via a sibling temp file and a rename, so the
/// file is either fully the old content or fully the new one. The original
/// permissions are kept.
///
/// The containing directory must be writable, since the temp file is created
/// next to the target. A writable file in a read-only directory is therefore
/// not replaced; the error names the directory.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path)
        .map_err(|e| Error::filesystem(path, e))?
        .permissions();

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        Error::filesystem(
            dir,
            io::Error::new(
                e.kind(),
                format!("cannot create temp file in directory: {}", e),
            ),
        )
    })?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| Error::filesystem(tmp.path(), e))?;
    fs::set_permissions(tmp.path(), permissions).map_err(|e| Error::filesystem(tmp.path(), e))?;

    tmp.persist(path)
        .map_err(|e| Error::filesystem(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_replaces_content_exactly() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("pic.jpg");
        fs::write(&path, b"old content that is longer").unwrap();

        write_atomically(&path, b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
        // no temp files left behind
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let path = tmp.path().join("pic.jpg");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_atomically(&path, b"new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let tmp = tempdir().unwrap();
        let result = write_atomically(&tmp.path().join("gone.jpg"), b"new");
        assert!(matches!(result, Err(Error::Filesystem { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_directory_names_the_directory() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("locked");
        fs::create_dir(&dir).unwrap();
        let path = dir.join("pic.jpg");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        // privileged users ignore directory permissions
        if fs::write(dir.join("canary"), b"").is_ok() {
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = write_atomically(&path, b"new");
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(Error::Filesystem { path: failed, source }) => {
                assert_eq!(failed, dir);
                assert!(source.to_string().contains("directory"));
            }
            other => panic!("expected a filesystem error, got {:?}", other),
        }
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }
}
