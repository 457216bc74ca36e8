use std::{fs, io::ErrorKind, path::PathBuf};

#[cfg(test)]
use std::{collections::HashMap, sync::Mutex};

use tracing::debug;

use crate::services::{errors::StorageError, shared::hash_string};

pub mod models;
pub mod queries;

/// Flat string key-value storage, the local equivalent of browser storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            debug!("Folder created at: {:?}", dir);
        }
        Ok(FileStore { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // keys are arbitrary text, file names are not
        let file_name = format!("{}.json", &hash_string(key)[..16]);
        self.dir.join(file_name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // a poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_values() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();

        assert_eq!(store.get("exchangeHistory").unwrap(), None);
        store.set("exchangeHistory", "[]").unwrap();
        assert_eq!(store.get("exchangeHistory").unwrap().as_deref(), Some("[]"));

        store.set("exchangeHistory", "[1]").unwrap();
        assert_eq!(store.get("exchangeHistory").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn file_store_remove_deletes_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();

        store.set("exchangeHistory", "[]").unwrap();
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);

        store.remove("exchangeHistory").unwrap();
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
        assert_eq!(store.get("exchangeHistory").unwrap(), None);

        // second removal is a no-op
        store.remove("exchangeHistory").unwrap();
    }

    #[test]
    fn file_store_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn keys_do_not_collide() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert!(!store.contains("a"));
        assert!(store.contains("b"));
    }
}
