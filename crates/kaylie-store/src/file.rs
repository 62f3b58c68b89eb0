//! # File Storage
//!
//! Snapshot files on the local disk, one per storage key.
//!
//! ## Layout
//! ```text
//! <data_dir>/
//! ├── kaylie-labs-cart.json      ◄─── current snapshot
//! └── .kaylie-labs-cart.tmp      ◄─── only exists mid-write
//! ```
//!
//! ## Crash Safety
//! A save writes the temporary file, flushes it, then renames it over the
//! snapshot. Readers see either the old snapshot or the new one, never a
//! truncated mix.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use kaylie_core::validation::validate_storage_key;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::storage::CartStorage;

/// File-backed [`CartStorage`].
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens storage rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(dir.display().to_string(), e))?;
        debug!(dir = %dir.display(), "file storage opened");
        Ok(FileStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `key`.
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_storage_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.tmp", key))
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn save(&mut self, key: &str, data: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.temp_path_for(key);

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(data.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        };

        write().map_err(|e| {
            // Best effort; the next save recreates it anyway
            let _ = fs::remove_file(&tmp);
            StorageError::io(key, e)
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("data");

        let storage = FileStorage::open(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(storage.dir(), dir.as_path());
    }

    #[test]
    fn test_save_load_overwrite() {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(tmp.path()).unwrap();

        assert_eq!(storage.load("kaylie-labs-cart").unwrap(), None);

        storage.save("kaylie-labs-cart", "first").unwrap();
        storage.save("kaylie-labs-cart", "second").unwrap();
        assert_eq!(
            storage.load("kaylie-labs-cart").unwrap().as_deref(),
            Some("second")
        );
        assert!(tmp.path().join("kaylie-labs-cart.json").is_file());
        assert!(!tmp.path().join(".kaylie-labs-cart.tmp").exists());
    }

    #[test]
    fn test_data_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        FileStorage::open(tmp.path())
            .unwrap()
            .save("cart", "persisted")
            .unwrap();

        let reopened = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(reopened.load("cart").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_key_cannot_escape_directory() {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(tmp.path()).unwrap();

        assert!(matches!(
            storage.save("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.load("a/b"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_read_error_is_reported() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        // A directory where the snapshot file should be
        fs::create_dir(tmp.path().join("cart.json")).unwrap();

        assert!(matches!(
            storage.load("cart"),
            Err(StorageError::Io { .. })
        ));
    }
}
