//! Filesystem adapter.
//!
//! ## `LocalFs::write`: atomic protocol
//!
//! 1. Ensure the parent directory exists.
//! 2. Write bytes to `<path>.iconsync.tmp`.
//! 3. Rename to the final path (atomic on POSIX).
//! 4. On rename failure, remove the temp file and leave the original intact.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use iconsync_core::ASSET_EXTENSION;

use crate::error::{io_err, SyncError};

/// Suffix appended to a target path while it is being written.
pub const TMP_SUFFIX: &str = ".iconsync.tmp";

/// Filesystem operations used by the reconciler and manifest versioner.
pub trait AssetFs {
    /// Create `dir` and any missing parents.
    fn ensure_dir(&self, dir: &Path) -> Result<(), SyncError>;

    /// Names of regular files directly inside `dir`; empty if `dir` is missing.
    fn list_dir(&self, dir: &Path) -> Result<BTreeSet<String>, SyncError>;

    /// File contents, or `None` if the file does not exist.
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, SyncError>;

    /// Replace the file at `path` with `bytes`.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SyncError>;

    /// Remove the file at `path`. A missing file is not an error.
    fn delete(&self, path: &Path) -> Result<(), SyncError>;
}

/// Managed asset names in `dir`: files with the `.svg` extension.
pub fn list_assets(fs: &dyn AssetFs, dir: &Path) -> Result<BTreeSet<String>, SyncError> {
    Ok(fs
        .list_dir(dir)?
        .into_iter()
        .filter(|name| is_asset_name(name))
        .collect())
}

pub(crate) fn is_asset_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == ASSET_EXTENSION)
}

/// [`AssetFs`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    fn write_with_tmp(&self, path: &Path, bytes: &[u8], tmp: &Path) -> Result<(), SyncError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::write(tmp, bytes).map_err(|e| io_err(tmp, e))?;

        if let Err(e) = std::fs::rename(tmp, path) {
            let _ = std::fs::remove_file(tmp);
            return Err(io_err(path, e));
        }
        Ok(())
    }
}

impl AssetFs for LocalFs {
    fn ensure_dir(&self, dir: &Path) -> Result<(), SyncError> {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))
    }

    fn list_dir(&self, dir: &Path) -> Result<BTreeSet<String>, SyncError> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(err) => return Err(io_err(dir, err)),
        };
        let mut names = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_err(dir, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| io_err(entry.path(), e))?
                .is_file();
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.insert(name.to_string());
            }
        }
        Ok(names)
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, SyncError> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(path, err)),
        }
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
        self.write_with_tmp(path, bytes, &tmp_path(path))
    }

    fn delete(&self, path: &Path) -> Result<(), SyncError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_err(path, err)),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn write_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("icons").join("a.svg");
        LocalFs.write(&path, b"<svg/>").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"<svg/>");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.svg");
        LocalFs.write(&path, b"data").unwrap();
        assert!(!tmp_path(&path).exists(), ".iconsync.tmp must be cleaned up");
    }

    #[test]
    fn write_overwrites_existing_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.svg");
        LocalFs.write(&path, b"v1").unwrap();
        LocalFs.write(&path, b"v2").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"v2");
    }

    #[test]
    fn read_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(LocalFs.read(&tmp.path().join("nope.svg")).unwrap().is_none());
    }

    #[test]
    fn delete_missing_is_ok() {
        let tmp = TempDir::new().unwrap();
        LocalFs.delete(&tmp.path().join("nope.svg")).unwrap();
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let listed = LocalFs.list_dir(&tmp.path().join("absent")).unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn list_assets_filters_extension_and_directories() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.svg"), "").unwrap();
        fs::write(tmp.path().join("b.svg.iconsync.tmp"), "").unwrap();
        fs::write(tmp.path().join("README.md"), "").unwrap();
        fs::create_dir(tmp.path().join("dir.svg")).unwrap();

        let assets = list_assets(&LocalFs, tmp.path()).unwrap();
        assert_eq!(assets.into_iter().collect::<Vec<_>>(), vec!["a.svg"]);
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("a.svg");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp = tmp_dir.path().join("a.svg.iconsync.tmp");

        let result = LocalFs.write_with_tmp(&path, b"new content", &tmp);

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        // Root ignores directory permissions; only assert when the rename failed.
        if result.is_err() {
            assert_eq!(fs::read_to_string(&path).unwrap(), "original");
            assert!(!tmp.exists(), ".iconsync.tmp should be cleaned up");
        }
    }
}
