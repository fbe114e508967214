use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::kv::KeyValueStore;

/// Directory-backed key-value store: each key is a `<key>.json` file.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-write leaves the previous value intact. There is no locking; two
/// processes sharing a directory race with last-write-wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::Write {
            key: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "keys must be non-empty ASCII alphanumerics, '_' or '-'".to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        let write_err = |e: std::io::Error| {
            if e.kind() == ErrorKind::StorageFull {
                StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    available: 0,
                }
            } else {
                StorageError::Write {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let written = std::fs::write(&tmp_path, value.as_bytes())
            .and_then(|()| std::fs::rename(&tmp_path, &path));
        if let Err(e) = written {
            // A failed write can leave a partial temp file behind.
            let _ = std::fs::remove_file(&tmp_path);
            return Err(write_err(e));
        }

        tracing::debug!(path = %path.display(), bytes = value.len(), "value written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "value removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
