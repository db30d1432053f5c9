//! Storage layer
//!
//! The store persists through a host-supplied key-value string interface.
//!
//! ## Backends
//!
//! - **FileStore**: one file per key, atomic writes (used by the CLI)
//! - **MemoryStore**: shared in-memory map (tests and embedding hosts)

pub mod error;
pub mod file;
pub mod kv;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore, ENTRIES_BACKUP_KEY, ENTRIES_KEY, THEME_KEY};
