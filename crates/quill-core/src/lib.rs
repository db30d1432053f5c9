//! Quill Core Library
//!
//! This crate provides the core of Quill, a local-first journal: the entry
//! lifecycle (add, update, delete), import-merge, and persistence through a
//! host-supplied key-value string store.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = EntryStore::open(FileStore::new(&config.data_dir));
//!
//! let check = validate_markup(&title, &content, config.min_content_length);
//! if check.valid {
//!     store.add(title, content, parse_tags(&raw_tags))?;
//! }
//!
//! let outcome = store.import_json(&payload)?;
//! println!("Imported {} new post(s).", outcome.added_count);
//! ```
//!
//! # Modules
//!
//! - `store`: Entry collection and its mutations (main entry point)
//! - `shared`: Lock-protected store handle for concurrent callers
//! - `models`: The `Entry` record and tag parsing
//! - `validation`: Title/content checks and plain-text projection
//! - `import`: Import payload parsing and dedup-merge
//! - `storage`: Key-value backends
//! - `id`, `clock`: Injectable id and time sources
//! - `theme`: Light/dark preference
//! - `config`: Application configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod import;
pub mod models;
pub mod shared;
pub mod storage;
pub mod store;
pub mod theme;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use id::{IdGenerator, IdStrategy, SequentialIds, TimestampIds, UuidIds};
pub use import::{parse_import, ImportError, ImportedEntry};
pub use models::{parse_tags, Entry};
pub use shared::SharedEntryStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{EntryStore, ImportOutcome};
pub use theme::Theme;
pub use validation::{plain_text, validate, validate_markup, Validation};
