use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// A durable key → blob slot store (browser local storage, a directory, ...).
///
/// Both operations are synchronous; `retrieve` returns `Ok(None)` for a key
/// that was never persisted.
pub trait KeyValueStore {
    fn persist(&mut self, key: &str, blob: &str) -> Result<(), CoreError>;

    fn retrieve(&self, key: &str) -> Result<Option<String>, CoreError>;
}

/// Volatile store, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn persist(&mut self, key: &str, blob: &str) -> Result<(), CoreError> {
        self.slots.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.slots.get(key).cloned())
    }
}

/// One `<key>.json` file per slot inside a directory (native only).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// The directory is created lazily on the first `persist`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path backing `key`. Keys must be plain file stems.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        {
            return Err(CoreError::ValidationError(format!(
                "Invalid storage key '{key}': use letters, digits, '-' or '_'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn persist(&mut self, key: &str, blob: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, blob)?;
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
