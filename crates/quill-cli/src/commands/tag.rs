//! Tag command handlers

use anyhow::Result;

use quill_core::EntryStore;

use crate::output::Output;

/// List all tags with usage counts
pub fn list(store: &EntryStore, output: &Output) -> Result<()> {
    let tags = store.tags_with_counts();
    output.print_tags(&tags);
    Ok(())
}
