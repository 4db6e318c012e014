//! String key/value storage that outlives the process, used to persist the
//! session between runs

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use bursar_shared::log_err_as_warn;
use tracing::{debug, instrument, warn};

pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a key that is not present is not an error
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("failed to read storage file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write storage file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage file {path:?} does not contain a string map")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Keeps values only for the life of the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage(BTreeMap<String, String>);

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.0.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.0.remove(key);
        Ok(())
    }
}

/// Stores all keys as one JSON object in a file. Every change is written
/// through to disk
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values hold credentials so only the keys are shown
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FileStorage {
    /// A file that does not exist yet is treated as empty storage
    #[instrument(skip_all, fields(path = ?path.as_ref()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no storage file found, starting empty");
                BTreeMap::new()
            }
            Err(source) => return Err(StorageError::Read { path, source }),
        };
        Ok(Self { path, entries })
    }

    /// Same as [`Self::open`] except that a file which cannot be parsed is
    /// replaced by empty storage
    #[instrument(skip_all, fields(path = ?path.as_ref()))]
    pub fn open_or_reset<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        match Self::open(&path) {
            Err(e @ StorageError::Corrupt { .. }) => {
                warn!(?e, "discarding unreadable storage file");
                let storage = Self {
                    path: path.as_ref().to_path_buf(),
                    entries: BTreeMap::new(),
                };
                log_err_as_warn!(storage.flush());
                Ok(storage)
            }
            other => other,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes to a sibling file first then renames it over the original so a
    /// crash mid write leaves the previous contents
    fn flush(&self) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text =
            serde_json::to_string_pretty(&self.entries).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, text).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    #[instrument(skip(self, value))]
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    #[instrument(skip(self))]
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()
        } else {
            Ok(())
        }
    }
}
