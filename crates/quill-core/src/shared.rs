//! Thread-safe handle to an `EntryStore`
//!
//! Each call holds the lock for the whole read-modify-persist cycle, so the
//! persisted value always reflects the last completed mutation and
//! concurrent adds never lose an entry.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StoreResult;
use crate::import::ImportedEntry;
use crate::models::Entry;
use crate::store::{EntryStore, ImportOutcome};

/// Cloneable, lock-protected `EntryStore`
#[derive(Clone)]
pub struct SharedEntryStore {
    inner: Arc<Mutex<EntryStore>>,
}

impl SharedEntryStore {
    pub fn new(store: EntryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EntryStore> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` with exclusive access to the store
    pub fn with<R>(&self, f: impl FnOnce(&mut EntryStore) -> R) -> R {
        f(&mut self.lock())
    }

    /// Snapshot of the current collection
    pub fn entries(&self) -> Vec<Entry> {
        self.lock().entries().to_vec()
    }

    pub fn load(&self) -> Vec<Entry> {
        self.lock().load()
    }

    pub fn add(&self, title: &str, content: &str, tags: Vec<String>) -> StoreResult<Entry> {
        self.lock().add(title, content, tags)
    }

    pub fn update(
        &self,
        id: &str,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> StoreResult<Option<Entry>> {
        self.lock().update(id, title, content, tags)
    }

    pub fn delete(&self, id: &str) -> StoreResult<Vec<Entry>> {
        self.lock().delete(id)
    }

    pub fn import_merge(&self, incoming: Vec<ImportedEntry>) -> StoreResult<ImportOutcome> {
        self.lock().import_merge(incoming)
    }
}
