//! Status command handler

use anyhow::Result;

use quill_core::storage::ENTRIES_KEY;
use quill_core::theme::load_theme;
use quill_core::{Config, EntryStore, FileStore};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &EntryStore, config: &Config, output: &Output) -> Result<()> {
    let backend = FileStore::new(&config.data_dir);
    let size = backend.size_of(ENTRIES_KEY);
    let theme = load_theme(&backend);
    let tag_count = store.tags_with_counts().len();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "entries_file_size": size,
                    "theme": theme,
                    "id_strategy": config.id_strategy,
                    "min_content_length": config.effective_min_content_length(),
                    "counts": {
                        "entries": store.len(),
                        "tags": tag_count
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("Quill Status");
            println!("============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Size:     {}", human_size(size));
            println!();
            println!("Settings:");
            println!("  Theme:              {}", theme);
            println!("  Id strategy:        {}", config.id_strategy);
            println!(
                "  Min content length: {}",
                config.effective_min_content_length()
            );
            println!();
            println!("Contents:");
            println!("  Posts: {}", store.len());
            println!("  Tags:  {}", tag_count);
        }
    }

    Ok(())
}

fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
