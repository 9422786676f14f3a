pub mod json_backend;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};

use crate::core::errors::Result;

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

/// Raw string key/value persistence, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// JSON facade over a [`KeyValueStore`].
///
/// Failures never reach the caller as errors: reads degrade to `None` and
/// writes report `false`, each logged through `tracing`.
pub struct Store {
    backend: Box<dyn KeyValueStore>,
}

impl Store {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::default()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::error!(key, error = %err, "error reading from storage");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(key, error = %err, "stored value is not valid JSON for its type");
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!(key, error = %err, "error serializing value for storage");
                return false;
            }
        };
        match self.backend.write(key, &json) {
            Ok(()) => {
                tracing::debug!(key, bytes = json.len(), "stored value");
                true
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "error writing to storage");
                false
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        self.backend
            .delete(key)
            .map_err(|err| tracing::warn!(key, error = %err, "error removing from storage"))
            .is_ok()
    }

    pub fn clear(&self) -> bool {
        self.backend
            .clear()
            .map_err(|err| tracing::warn!(error = %err, "error clearing storage"))
            .is_ok()
    }

    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "error listing storage keys");
            Vec::new()
        })
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_none_for_missing_and_corrupt_values() {
        let backend = MemoryStore::default();
        backend.write("broken", "{not json").unwrap();
        let store = Store::new(Box::new(backend));
        assert_eq!(store.get::<Vec<u32>>("absent"), None);
        assert_eq!(store.get::<Vec<u32>>("broken"), None);
    }

    #[test]
    fn set_reports_false_when_quota_is_exceeded() {
        let store = Store::new(Box::new(MemoryStore::with_quota(8)));
        assert!(store.set("small", &1u8));
        assert!(!store.set("large", &"a string well over eight bytes"));
        assert_eq!(store.get::<String>("large"), None);
    }

    #[test]
    fn remove_and_clear_drop_keys() {
        let store = Store::in_memory();
        assert!(store.set("a", &[1, 2, 3]));
        assert!(store.set("b", &true));
        assert!(store.remove("a"));
        assert_eq!(store.keys(), vec!["b".to_string()]);
        assert!(store.clear());
        assert!(store.keys().is_empty());
    }
}
