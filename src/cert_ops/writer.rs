//! Atomic artifact writes and backups

use crate::utils::{CertKitError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// `<path>.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".backup");
    PathBuf::from(name)
}

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// The destination is replaced by a rename, so it holds either the old
/// content or the new content, never a partial write. Permissions of an
/// existing destination are carried over; a new destination gets the usual
/// umask-filtered mode of a freshly created file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |message: String| CertKitError::WriteError {
        path: path.to_path_buf(),
        message,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let existing = std::fs::metadata(path).ok();
    let mut tmp = temp_file(dir, existing.is_none()).map_err(|e| write_err(e.to_string()))?;
    tmp.write_all(bytes).map_err(|e| write_err(e.to_string()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| write_err(e.to_string()))?;

    if let Some(meta) = existing {
        std::fs::set_permissions(tmp.path(), meta.permissions())
            .map_err(|e| write_err(e.to_string()))?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(unix)]
fn temp_file(dir: &Path, fresh: bool) -> std::io::Result<tempfile::NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = tempfile::Builder::new();
    if fresh {
        // 0666 before the process umask, like a plain create
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file(dir: &Path, _fresh: bool) -> std::io::Result<tempfile::NamedTempFile> {
    tempfile::NamedTempFile::new_in(dir)
}

/// Copy an existing file to `<path>.backup`. Returns the backup path, or
/// `None` when there was nothing to back up.
pub fn copy_backup(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let backup = backup_path(path);
    std::fs::copy(path, &backup).map_err(|e| CertKitError::WriteError {
        path: backup.clone(),
        message: e.to_string(),
    })?;
    Ok(Some(backup))
}

/// Move an existing file to `<path>.backup`, replacing an older backup
pub fn move_to_backup(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let backup = backup_path(path);
    std::fs::rename(path, &backup).map_err(|e| CertKitError::WriteError {
        path: backup.clone(),
        message: e.to_string(),
    })?;
    Ok(Some(backup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("data/server.crt")),
            PathBuf::from("data/server.crt.backup")
        );
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.crt");
        std::fs::write(&path, b"old").unwrap();

        write_atomic(&path, b"new\n").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new\n");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("esp.crt");
        write_atomic(&fresh, b"cert\n").unwrap();

        let plain = dir.path().join("plain.crt");
        std::fs::write(&plain, b"cert\n").unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&fresh), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_mode_is_kept() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.key");
        std::fs::write(&path, b"old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();

        write_atomic(&path, b"new\n").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_move_and_copy_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.key");
        assert!(move_to_backup(&path).unwrap().is_none());

        std::fs::write(&path, b"key").unwrap();
        let backup = copy_backup(&path).unwrap().unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(&backup).unwrap(), b"key");

        std::fs::write(&path, b"key2").unwrap();
        let backup = move_to_backup(&path).unwrap().unwrap();
        assert!(!path.exists());
        assert_eq!(std::fs::read(backup).unwrap(), b"key2");
    }
}
