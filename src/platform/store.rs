// SocLookup - platform/store.rs
//
// File-backed key/value store: one JSON file per key in the data directory.
//
// - Saves are atomic (write temp -> rename) so a crash during save never
//   corrupts the previous good value.
// - Load errors are logged and reported as "absent"; the caller falls back
//   to its defaults rather than surfacing an error.
// - The data directory is created on first save.

use crate::core::store::KeyValueStore;
use crate::util::constants::STORE_FILE_EXTENSION;
use crate::util::error::StoreError;
use std::path::{Path, PathBuf};

/// Persists each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` are replaced
    /// so a key can never escape the data directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.{STORE_FILE_EXTENSION}"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key);
        std::fs::read(&path)
            .map_err(|e| {
                // "Not found" is the normal first-run case.
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "Cannot read stored value");
                }
            })
            .ok()
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(key);
        let tmp = path.with_extension(format!("{STORE_FILE_EXTENSION}.tmp"));

        std::fs::write(&tmp, bytes).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;

        std::fs::rename(&tmp, &path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp);
            StoreError::Io {
                path: path.clone(),
                source,
            }
        })?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Value saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert!(store.load("searchHistory").is_none());
        store.save("searchHistory", b"[1,2,3]").unwrap();
        assert_eq!(store.load("searchHistory").unwrap(), b"[1,2,3]");
        assert!(dir.path().join("nested").join("searchHistory.json").exists());
    }

    #[test]
    fn test_file_store_overwrite_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        // Simulate a leftover temp file from an earlier crash.
        std::fs::write(dir.path().join("k.json.tmp"), b"garbage").unwrap();

        store.save("k", b"first").unwrap();
        store.save("k", b"second").unwrap();
        assert_eq!(store.load("k").unwrap(), b"second");
        assert!(!dir.path().join("k.json.tmp").exists());
    }

    #[test]
    fn test_key_cannot_escape_directory() {
        let store = FileStore::new("/data");
        let path = store.path_for("../../etc/passwd");
        assert_eq!(path, PathBuf::from("/data/______etc_passwd.json"));
    }
}
