//! Import parsing and dedup-merge
//!
//! An import payload is the export format: a JSON array of entry objects.
//! Anything else is rejected wholesale, never partially imported.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{normalize_tags, Entry};
use crate::validation::plain_text;

/// Malformed import payload
#[derive(Error, Debug)]
pub enum ImportError {
    /// Payload is not JSON at all
    #[error("Import file is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Top-level value is not an array
    #[error("Invalid file format: expected a JSON array of entries, found {found}")]
    NotAnArray { found: &'static str },

    /// An element is not an object
    #[error("Entry #{index} is not an object")]
    NotAnObject { index: usize },

    /// An element lacks a required field or has it with the wrong type
    #[error("Entry #{index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// A required string field is blank
    #[error("Entry #{index} has an empty '{field}'")]
    EmptyField { index: usize, field: &'static str },

    /// Any other shape problem (bad timestamp, bad tags, ...)
    #[error("Entry #{index} is malformed: {details}")]
    Malformed { index: usize, details: String },
}

/// Entry as it appears in an import file
///
/// Accepts the legacy `created` / `lastEdited` field names. A missing
/// creation time is filled in by the importing store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRecord {
    id: String,
    title: String,
    content: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default, alias = "created")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "lastEdited")]
    last_edited_at: Option<DateTime<Utc>>,
}

/// Validated import entry, before the store assigns defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_edited_at: Option<DateTime<Utc>>,
}

impl ImportedEntry {
    /// Check the fields every stored entry must have
    ///
    /// `index` is the entry's position in its batch, for error reporting.
    pub fn check(&self, index: usize) -> Result<(), ImportError> {
        if self.id.trim().is_empty() {
            return Err(ImportError::EmptyField { index, field: "id" });
        }
        if self.title.trim().is_empty() {
            return Err(ImportError::EmptyField {
                index,
                field: "title",
            });
        }
        if plain_text(&self.content).trim().is_empty() {
            return Err(ImportError::EmptyField {
                index,
                field: "content",
            });
        }
        Ok(())
    }

    /// Complete into an `Entry`, using `now` when no creation time was given
    pub fn into_entry(self, now: DateTime<Utc>) -> Entry {
        let created_at = self.created_at.unwrap_or(now);
        Entry {
            id: self.id,
            title: self.title,
            content: self.content,
            tags: normalize_tags(self.tags),
            created_at,
            last_edited_at: self.last_edited_at.map(|t| t.max(created_at)),
        }
    }
}

impl From<Entry> for ImportedEntry {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            tags: entry.tags,
            created_at: Some(entry.created_at),
            last_edited_at: entry.last_edited_at,
        }
    }
}

/// Parse an import payload
pub fn parse_import(payload: &str) -> Result<Vec<ImportedEntry>, ImportError> {
    let value: Value = serde_json::from_str(payload).map_err(ImportError::InvalidJson)?;
    parse_import_value(value)
}

/// Parse an already-decoded JSON value as an import batch
pub fn parse_import_value(value: Value) -> Result<Vec<ImportedEntry>, ImportError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ImportError::NotAnArray {
                found: json_kind(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_record(index, item))
        .collect()
}

fn parse_record(index: usize, item: Value) -> Result<ImportedEntry, ImportError> {
    let obj = item
        .as_object()
        .ok_or(ImportError::NotAnObject { index })?;

    for field in ["id", "title", "content"] {
        if !obj.get(field).map(Value::is_string).unwrap_or(false) {
            return Err(ImportError::MissingField { index, field });
        }
    }

    let record: ImportRecord = serde_json::from_value(item).map_err(|e| ImportError::Malformed {
        index,
        details: e.to_string(),
    })?;

    let entry = ImportedEntry {
        id: record.id,
        title: record.title,
        content: record.content,
        tags: normalize_tags(record.tags.unwrap_or_default()),
        created_at: record.created_at,
        last_edited_at: record.last_edited_at,
    };
    entry.check(index)?;
    Ok(entry)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Combine an incoming batch with an existing collection
///
/// Incoming entries whose id is already present (in `existing` or earlier
/// in the batch) are dropped. Survivors keep their batch order and go in
/// front of `existing`. Returns the merged collection and how many entries
/// were added.
pub fn merge(existing: &[Entry], incoming: Vec<Entry>) -> (Vec<Entry>, usize) {
    let mut seen: HashSet<String> = existing.iter().map(|e| e.id.clone()).collect();

    let fresh: Vec<Entry> = incoming
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect();
    let added = fresh.len();

    let mut merged = fresh;
    merged.extend(existing.iter().cloned());
    (merged, added)
}
