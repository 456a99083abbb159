use fs_err as fs;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{Result, WizardError};

/// Synchronous string key/value store. Everything that survives between
/// wizard runs (form data, provider choices, custom endpoint settings)
/// goes through this.
pub trait PersistenceService: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceService for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// All keys live in one JSON object file, rewritten on every mutation.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| WizardError::Storage(e.to_string()))?;
        }
        Ok(Self { path, lock: Mutex::new(()) })
    }

    /// `<root>/.contentgen/storage.json`
    pub fn in_root(root: &Path) -> Result<Self> {
        Self::open(root.join(".contentgen").join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable storage file is moved before it gets rewritten.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".bak");
        self.path.with_file_name(name)
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|e| WizardError::Storage(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                let backup = self.backup_path();
                fs::rename(&self.path, &backup).map_err(|e| WizardError::Storage(e.to_string()))?;
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "storage file is not a JSON object; moved it aside and starting empty"
                );
                Ok(Map::new())
            }
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<()> {
        let text = serde_json::to_string_pretty(map).map_err(|e| WizardError::Storage(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| WizardError::Storage(e.to_string()))
    }
}

impl PersistenceService for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        let map = self.read_all()?;
        Ok(map.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut map = self.read_all()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_root(dir.path()).unwrap();
        store.set("contentgen.preferredProvider", "claude").unwrap();
        drop(store);

        let reopened = FileStore::in_root(dir.path()).unwrap();
        assert_eq!(
            reopened.get("contentgen.preferredProvider").unwrap().as_deref(),
            Some("claude")
        );
    }

    #[test]
    fn file_store_tolerates_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("x").unwrap(), None);
        assert_eq!(std::fs::read_to_string(store.backup_path()).unwrap(), "not json");
        store.set("x", "y").unwrap();
        assert_eq!(store.get("x").unwrap().as_deref(), Some("y"));
    }

    #[test]
    fn corrupt_file_is_kept_aside_before_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{\"contentgen.customApi\": ").unwrap();
        let store = FileStore::open(&path).unwrap();

        store.set("contentgen.preferredProvider", "gemini").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("storage.json.bak")).unwrap(),
            "{\"contentgen.customApi\": "
        );
        assert_eq!(store.get("contentgen.preferredProvider").unwrap().as_deref(), Some("gemini"));
    }
}
