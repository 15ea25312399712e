//! Durable key-value storage and the API credential kept in it.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::ServiceError;

/// Fixed storage key of the generative API credential.
pub const CREDENTIAL_KEY: &str = "apiKey";

/// Minimal durable key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError>;
}

/// Store persisted as a single JSON object on disk.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Platform data directory path: `<data_dir>/escrivao/storage.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("escrivao").join("storage.json"))
    }

    fn read_map(&self) -> Result<BTreeMap<String, serde_json::Value>, ServiceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(ServiceError::Storage(e.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            ServiceError::Storage(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write_map(&self, map: &BTreeMap<String, serde_json::Value>) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ServiceError::Storage(e.to_string()))?;
        }
        let content =
            serde_json::to_string_pretty(map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| ServiceError::Storage(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| ServiceError::Storage(e.to_string()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let map = self.read_map()?;
        Ok(map.get(key).and_then(|v| v.as_str()).map(String::from))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_map()?;
        map.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        self.write_map(&map)
    }
}

/// In-process store; contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The API credential, read from and written to a [`KeyValueStore`].
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored key, if any. Blank values count as absent.
    pub fn load(&self) -> Result<Option<String>, ServiceError> {
        Ok(self
            .store
            .get(CREDENTIAL_KEY)?
            .filter(|k| !k.trim().is_empty()))
    }

    /// Persist `key` (trimmed), overwriting any previous value.
    pub fn save(&self, key: &str) -> Result<(), ServiceError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ServiceError::InvalidOptions(
                "Informe uma chave API não vazia.".into(),
            ));
        }
        self.store.set(CREDENTIAL_KEY, key)?;
        tracing::info!("API credential saved");
        Ok(())
    }
}

/// Open the durable store at `path` (or the platform default).
///
/// Falls back to an in-memory store when no data directory can be determined.
pub fn build_store(path: Option<&Path>) -> Arc<dyn KeyValueStore> {
    let path = path.map(Path::to_path_buf).or_else(JsonFileStore::default_path);
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using file-backed credential store");
            Arc::new(JsonFileStore::new(path))
        }
        None => {
            tracing::warn!("no data directory available, credential will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}
