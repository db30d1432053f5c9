//! Key-value string storage
//!
//! The host supplies the persistence collaborator; the core only ever reads
//! and overwrites whole string values by key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::error::StorageResult;

/// Key under which the entry collection is stored
pub const ENTRIES_KEY: &str = "entries";

/// Key under which the theme preference is stored
pub const THEME_KEY: &str = "theme";

/// Key holding the last unparseable entries value, kept before it is replaced
pub const ENTRIES_BACKUP_KEY: &str = "entries.corrupt.backup";

/// Opaque key-value string store
pub trait KeyValueStore: Send {
    /// Read the value for `key`, `None` if it was never set
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the value for `key`
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    writes: usize,
}

/// In-memory store
///
/// Clones share the same map, which lets a second store instance "reload"
/// what the first one persisted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `set` calls across all clones
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Raw value currently held under `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Seed a value without counting it as a write
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().values.insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.lock();
        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_get_set() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_memory_clones_share_state() {
        let mut a = MemoryStore::new();
        let b = a.clone();
        a.set(ENTRIES_KEY, "[]").unwrap();
        assert_eq!(b.raw(ENTRIES_KEY).as_deref(), Some("[]"));
        assert_eq!(b.writes(), 1);
    }

    #[test]
    fn test_insert_raw_is_not_a_write() {
        let store = MemoryStore::new();
        store.insert_raw(THEME_KEY, "dark");
        assert_eq!(store.writes(), 0);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_boxed_store() {
        let mem = MemoryStore::new();
        let mut boxed: Box<dyn KeyValueStore> = Box::new(mem.clone());
        boxed.set("k", "v").unwrap();
        assert_eq!(boxed.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(mem.writes(), 1);
    }
}
