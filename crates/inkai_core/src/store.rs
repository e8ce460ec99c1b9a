//! Key-value persistence slots.
//!
//! Each key holds one whole string value. Writes always replace the entire
//! value; there is no partial or append-only update.
//!
//! On disk every key is a file under the store root:
//! ```text
//! <data_dir>/
//! └── INK_AI_STORY_HISTORY.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// A string-keyed slot store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if nothing was ever written.
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Delete the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// File-backed store, one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::PersistenceRead {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let write_err = |e: std::io::Error| CoreError::PersistenceWrite {
            key: key.to_string(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.root).map_err(write_err)?;

        // Write next to the target and rename, so readers never see a torn value
        let mut file = NamedTempFile::new_in(&self.root).map_err(write_err)?;
        file.write_all(value.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        let path = self.path_for(key);
        file.persist(&path).map_err(|e| write_err(e.error))?;

        debug!("Saved {} to {:?}", key, path);
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::PersistenceWrite {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// In-process store. Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.slots.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.slots.write().remove(key);
        Ok(())
    }
}
