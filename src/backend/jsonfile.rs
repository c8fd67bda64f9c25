//! File-backed storage backend: one JSON document per key.
//!
//! Each key maps to `<dir>/<key>.json`. This is the persistent analog of the
//! browser-storage provider the engine was designed against: synchronous
//! whole-value reads and writes, no transactions, no partial updates.

use super::StorageBackend;
use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Storage backend that keeps every key in its own JSON file.
///
/// Writes go through a temporary file followed by a rename, so readers never
/// observe a partially written value. Keys are used as file names verbatim
/// and must not contain path separators.
#[derive(Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Open (creating if necessary) a backend rooted at `dir`.
    ///
    /// # Errors
    /// Returns `Err` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(JsonFileBackend { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(Error::Backend(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl StorageBackend for JsonFileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!("✓ JsonFile GET {} -> HIT", key);
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("✓ JsonFile GET {} -> MISS", key);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!("✓ JsonFile SET {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("✓ JsonFile REMOVE {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.dir.is_dir())
    }
}
