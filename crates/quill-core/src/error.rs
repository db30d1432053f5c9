//! Store-level errors

use thiserror::Error;

use crate::import::ImportError;
use crate::storage::StorageError;

/// Errors returned by `EntryStore` operations
///
/// None of these leave the store in a changed state.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key-value backend failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The import payload was rejected
    #[error(transparent)]
    Import(#[from] ImportError),

    /// The id generator kept producing ids that are already taken
    #[error("Could not generate an unused entry id after {attempts} attempts")]
    IdExhausted { attempts: usize },

    /// The collection could not be encoded for persistence
    #[error("Failed to serialize entries: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::Storage(e) => e.recovery_suggestion(),
            StoreError::Import(_) => {
                Some("Check that the file is a Quill export (a JSON array of entries).")
            }
            StoreError::IdExhausted { .. } => {
                Some("Switch id_strategy to 'uuid' in the configuration.")
            }
            StoreError::Serialize(_) => None,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
