//! Entry store
//!
//! The `EntryStore` owns the ordered entry collection and is the only
//! writer of the entries key. Every mutating call ends in exactly one
//! full-collection write; no-op and failure paths write nothing and leave
//! the in-memory collection as it was. The one exception: an unparseable
//! value found on load is first copied to the backup key, once.
//!
//! ## Ordering
//!
//! Most-recent-first: `add` prepends, `import_merge` prepends the new batch
//! in its own order, `update` keeps the entry where it is.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = EntryStore::open(MemoryStore::new());
//!
//! let entry = store.add("Hello", "<p>First post</p>", vec!["life".into()])?;
//! store.update(&entry.id, "Hello v2", "<p>Edited</p>", vec![])?;
//! store.delete(&entry.id)?;
//! ```

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::id::{IdGenerator, UuidIds};
use crate::import::{self, ImportedEntry};
use crate::models::Entry;
use crate::storage::{FileStore, KeyValueStore, ENTRIES_BACKUP_KEY, ENTRIES_KEY};

/// How many ids to draw before giving up on finding an unused one
const MAX_ID_ATTEMPTS: usize = 64;

/// Result of an import-merge
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// The collection after the merge
    pub merged: Vec<Entry>,
    /// Number of incoming entries that were actually added
    pub added_count: usize,
}

/// Owner of the entry collection and its persistence
pub struct EntryStore {
    backend: Box<dyn KeyValueStore>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    entries: Vec<Entry>,
    /// Unparseable value found on load, copied aside before the first write
    corrupt: Option<String>,
}

impl EntryStore {
    /// Open a store over `backend`, reading whatever is persisted there
    ///
    /// Uses UUID ids and the system clock.
    pub fn open(backend: impl KeyValueStore + 'static) -> Self {
        let backend: Box<dyn KeyValueStore> = Box::new(backend);
        let (entries, corrupt) = read_stored(backend.as_ref());
        Self {
            backend,
            ids: Box::new(UuidIds),
            clock: Box::new(SystemClock),
            entries,
            corrupt,
        }
    }

    /// Open the file-backed store described by `config`
    pub fn open_with_config(config: &Config) -> Self {
        Self::open(FileStore::new(&config.data_dir))
            .with_id_generator(config.id_strategy.generator())
    }

    /// Replace the id generator
    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Re-read the persisted collection
    ///
    /// An absent or unparseable value yields an empty collection; this
    /// never fails.
    pub fn load(&mut self) -> Vec<Entry> {
        let (entries, corrupt) = read_stored(self.backend.as_ref());
        self.entries = entries;
        self.corrupt = corrupt;
        self.entries.clone()
    }

    // ==================== Queries ====================

    /// Current collection, most recent first
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Get an entry by id
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries whose id starts with `prefix`
    pub fn find_by_id_prefix(&self, prefix: &str) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| e.id.starts_with(prefix))
            .collect()
    }

    /// Entries carrying `tag`, in collection order
    pub fn entries_by_tag(&self, tag: &str) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.has_tag(tag)).collect()
    }

    /// All tags with usage counts, alphabetical
    pub fn tags_with_counts(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in &self.entries {
            let unique: HashSet<&str> = entry.tags.iter().map(String::as_str).collect();
            for tag in unique {
                *counts.entry(tag).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON export of the collection
    pub fn export_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    // ==================== Mutations ====================

    /// Create a new entry at the front of the collection
    ///
    /// The caller is expected to have validated `title` and `content`.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> StoreResult<Entry> {
        let id = self.fresh_id()?;
        let entry = Entry::new(id, title, content, tags, self.clock.now());

        self.entries.insert(0, entry.clone());
        if let Err(e) = self.persist() {
            self.entries.remove(0);
            return Err(e);
        }

        debug!(id = %entry.id, "Added entry");
        Ok(entry)
    }

    /// Rewrite an entry's title, content and tags
    ///
    /// Returns `None` (and writes nothing) if `id` is unknown.
    pub fn update(
        &mut self,
        id: &str,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> StoreResult<Option<Entry>> {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            debug!(id, "Update skipped, entry not found");
            return Ok(None);
        };

        let previous = self.entries[index].clone();
        let now = self.clock.now();
        self.entries[index].apply_edit(title, content, tags, now);

        if let Err(e) = self.persist() {
            self.entries[index] = previous;
            return Err(e);
        }

        debug!(id, "Updated entry");
        Ok(Some(self.entries[index].clone()))
    }

    /// Remove an entry, returning the resulting collection
    ///
    /// Deleting an unknown id is a no-op.
    pub fn delete(&mut self, id: &str) -> StoreResult<Vec<Entry>> {
        if let Some(index) = self.entries.iter().position(|e| e.id == id) {
            let removed = self.entries.remove(index);
            if let Err(e) = self.persist() {
                self.entries.insert(index, removed);
                return Err(e);
            }
            debug!(id, "Deleted entry");
        } else {
            debug!(id, "Delete skipped, entry not found");
        }
        Ok(self.entries.clone())
    }

    /// Merge an import batch into the collection
    ///
    /// Incoming entries whose id already exists are dropped; the rest are
    /// placed in front, keeping their batch order. A batch holding an entry
    /// with a blank id, title or content is rejected whole.
    pub fn import_merge(&mut self, incoming: Vec<ImportedEntry>) -> StoreResult<ImportOutcome> {
        for (index, entry) in incoming.iter().enumerate() {
            entry.check(index)?;
        }

        let now = self.clock.now();
        let incoming: Vec<Entry> = incoming.into_iter().map(|e| e.into_entry(now)).collect();
        let incoming_len = incoming.len();

        let (merged, added_count) = import::merge(&self.entries, incoming);
        if added_count > 0 {
            let previous = std::mem::replace(&mut self.entries, merged);
            if let Err(e) = self.persist() {
                self.entries = previous;
                return Err(e);
            }
        }

        info!(
            added = added_count,
            skipped = incoming_len - added_count,
            "Imported entries"
        );
        Ok(ImportOutcome {
            merged: self.entries.clone(),
            added_count,
        })
    }

    /// Parse a JSON import payload and merge it
    pub fn import_json(&mut self, payload: &str) -> StoreResult<ImportOutcome> {
        let incoming = import::parse_import(payload)?;
        self.import_merge(incoming)
    }

    /// Merge an already-decoded JSON value
    pub fn import_value(&mut self, value: Value) -> StoreResult<ImportOutcome> {
        let incoming = import::parse_import_value(value)?;
        self.import_merge(incoming)
    }

    fn fresh_id(&mut self) -> StoreResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !id.is_empty() && self.get(&id).is_none() {
                return Ok(id);
            }
            debug!(id = %id, "Generated id already in use, retrying");
        }
        Err(StoreError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn persist(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.entries)?;
        if let Some(raw) = &self.corrupt {
            self.backend.set(ENTRIES_BACKUP_KEY, raw)?;
            warn!(
                key = ENTRIES_BACKUP_KEY,
                bytes = raw.len(),
                "Backed up corrupt entries before overwriting"
            );
        }
        self.backend.set(ENTRIES_KEY, &json)?;
        self.corrupt = None;
        debug!(count = self.entries.len(), bytes = json.len(), "Persisted entries");
        Ok(())
    }
}

/// Read the persisted collection from `backend`
///
/// Missing, unreadable or unparseable values yield an empty collection.
/// Duplicate ids keep their first occurrence.
pub fn read_entries(backend: &dyn KeyValueStore) -> Vec<Entry> {
    read_stored(backend).0
}

/// Like `read_entries`, also returning the raw value when it was unparseable
fn read_stored(backend: &dyn KeyValueStore) -> (Vec<Entry>, Option<String>) {
    let raw = match backend.get(ENTRIES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Vec::new(), None),
        Err(e) => {
            warn!("Could not read stored entries, starting empty: {}", e);
            return (Vec::new(), None);
        }
    };

    if raw.trim().is_empty() {
        return (Vec::new(), None);
    }

    let entries: Vec<Entry> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Stored entries are corrupt, starting empty: {}", e);
            return (Vec::new(), Some(raw));
        }
    };

    let mut seen = HashSet::new();
    let total = entries.len();
    let entries: Vec<Entry> = entries
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect();
    if entries.len() != total {
        warn!(
            dropped = total - entries.len(),
            "Stored entries contained duplicate ids"
        );
    }
    (entries, None)
}
