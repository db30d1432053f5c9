//! Export and import handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quill_core::{EntryStore, StoreError};

use crate::output::Output;

/// Default export file name
pub const DEFAULT_EXPORT_FILE: &str = "blog-posts.json";

/// Export all entries as pretty-printed JSON
///
/// Writes to `path` (default `blog-posts.json`); `-` writes to stdout.
pub fn export(store: &EntryStore, path: Option<PathBuf>, output: &Output) -> Result<()> {
    if store.is_empty() {
        output.message("No posts to export.");
        return Ok(());
    }

    let json = store.export_json().context("Failed to export entries")?;
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));

    if path == Path::new("-") {
        println!("{}", json);
        return Ok(());
    }

    fs::write(&path, json).with_context(|| format!("Failed to write export file: {:?}", path))?;
    output.success(&format!(
        "Exported {} post(s) to {}",
        store.len(),
        path.display()
    ));
    Ok(())
}

/// Import entries from a previously exported file
///
/// Entries whose id already exists are skipped.
pub fn import(store: &mut EntryStore, path: PathBuf, output: &Output) -> Result<()> {
    let payload = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read import file: {:?}", path))?;

    let outcome = match store.import_json(&payload) {
        Ok(outcome) => outcome,
        Err(StoreError::Import(e)) => {
            anyhow::bail!("Import failed. Please upload a valid JSON file. ({})", e)
        }
        Err(e) => return Err(e).context("Failed to save imported entries"),
    };

    output.success(&format!("Imported {} new post(s).", outcome.added_count));
    Ok(())
}
