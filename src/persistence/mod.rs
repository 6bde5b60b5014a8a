//! Key/value persistence for scores and options
//!
//! Backends:
//! - `MemoryStore`: process-local (tests, headless runs without a data dir)
//! - `FileStore`: one JSON file per key, written via tmp file + rename (native)
//! - `LocalStore`: browser LocalStorage (wasm32)
//!
//! Errors stay at this boundary: callers log them and carry on with defaults.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read and deserialize a value; `Ok(None)` when the key was never written
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Browser LocalStorage, looked up on every call
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("no LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_shared_between_clones() {
        let mut store = MemoryStore::new();
        let reader = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(reader.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(reader.get("missing").unwrap(), None);
    }

    #[test]
    fn test_json_helpers() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "numbers", &vec![3u32, 1, 2]).unwrap();
        let back: Option<Vec<u32>> = load_json(&store, "numbers").unwrap();
        assert_eq!(back, Some(vec![3, 1, 2]));

        store.set("broken", "{").unwrap();
        let broken: Result<Option<Vec<u32>>, _> = load_json(&store, "broken");
        assert!(matches!(broken, Err(StoreError::Json(_))));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store() {
        let dir = std::env::temp_dir().join(format!("chain-reaction-store-{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get("scores").unwrap(), None);

        store.set("scores", "[1,2]").unwrap();
        store.set("scores", "[5]").unwrap();
        assert_eq!(store.get("scores").unwrap().as_deref(), Some("[5]"));
        assert!(!dir.join("scores.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
