//! Entry command handlers

use anyhow::{bail, Context, Result};

use quill_core::{parse_tags, validate_markup, Config, Entry, EntryStore};

use crate::editor::{compose, confirm, prompt_with_default};
use crate::output::{short_id, Output};

/// Create a new entry
pub fn create(
    store: &mut EntryStore,
    config: &Config,
    title: Option<String>,
    content: Option<String>,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    let title = match title {
        Some(t) => t,
        None => prompt_with_default("Title", "")?.unwrap_or_default(),
    };

    let content = match content {
        Some(c) => c,
        None => {
            let heading = vec![
                format!("New entry: {}", title.trim()),
                "Write the post as HTML below the marker line.".to_string(),
            ];
            compose(&heading, "").context("Failed to write entry")?
        }
    };

    let title = title.trim();
    let content = content.trim();
    check(title, content, config, output)?;

    let entry = store
        .add(title, content, collect_tags(&tags))
        .context("Failed to create entry")?;

    output.success(&format!("Published entry: {}", short_id(&entry.id)));
    output.print_entry(&entry);
    Ok(())
}

/// List entries, optionally filtered by tag
pub fn list(store: &EntryStore, tag: Option<String>, output: &Output) -> Result<()> {
    let entries: Vec<&Entry> = match tag {
        Some(ref t) => store.entries_by_tag(t),
        None => store.entries().iter().collect(),
    };

    output.print_entries(&entries);
    Ok(())
}

/// Show a single entry
pub fn show(store: &EntryStore, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(&id, store)?;
    let entry = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;

    output.print_entry(entry);
    Ok(())
}

/// Edit an entry
///
/// Fields given on the command line replace the current values; with no
/// fields given, the title and tags are prompted for and the content opens
/// in the editor.
pub fn edit(
    store: &mut EntryStore,
    config: &Config,
    id: String,
    title: Option<String>,
    content: Option<String>,
    tags: Option<String>,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(&id, store)?;
    let current = store
        .get(&id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;

    let interactive = title.is_none() && content.is_none() && tags.is_none();

    let (title, content, tags) = if interactive {
        println!("Editing entry: {}", current.id);
        println!("Press Enter to keep current value, or type new value.\n");

        let title = prompt_with_default("Title", &current.title)?.unwrap_or(current.title.clone());

        let current_tags = current.tags.join(", ");
        let tags = match prompt_with_default("Tags (comma-separated)", &current_tags)? {
            Some(raw) => parse_tags(&raw),
            None => current.tags.clone(),
        };

        let heading = vec![
            format!("Editing: {}", title),
            "Everything below the marker line is saved as the post.".to_string(),
        ];
        let content = compose(&heading, &current.content).context("Failed to edit entry")?;
        (title, content, tags)
    } else {
        (
            title.unwrap_or(current.title.clone()),
            content.unwrap_or(current.content.clone()),
            tags.map(|raw| parse_tags(&raw)).unwrap_or(current.tags.clone()),
        )
    };

    let title = title.trim();
    let content = content.trim();
    check(title, content, config, output)?;

    let updated = store
        .update(&id, title, content, tags)
        .context("Failed to update entry")?
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;

    output.success("Entry updated");
    output.print_entry(&updated);
    Ok(())
}

/// Delete an entry
pub fn delete(store: &mut EntryStore, id: String, yes: bool, output: &Output) -> Result<()> {
    let id = resolve_id(&id, store)?;
    let entry = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;

    if output.should_prompt() && !yes {
        println!("Delete entry: {} - {}", short_id(&entry.id), entry.title);
        if !confirm("Are you sure you want to delete this post?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete(&id).context("Failed to delete entry")?;

    output.success(&format!("Deleted entry: {}", id));
    Ok(())
}

/// Run the validator and report field errors
fn check(title: &str, content: &str, config: &Config, output: &Output) -> Result<()> {
    let validation = validate_markup(title, content, config.effective_min_content_length());
    if !validation.valid {
        output.print_validation(&validation);
        bail!("Entry not saved: {}", validation.messages().join(" "));
    }
    Ok(())
}

/// Flatten repeated `--tag` values, each of which may hold a comma list
fn collect_tags(raw: &[String]) -> Vec<String> {
    raw.iter().flat_map(|r| parse_tags(r)).collect()
}

/// Resolve an entry id (supports full id or unique prefix)
pub fn resolve_id(id: &str, store: &EntryStore) -> Result<String> {
    if store.get(id).is_some() {
        return Ok(id.to_string());
    }

    let matches = store.find_by_id_prefix(id);

    match matches.len() {
        0 => bail!("No entry found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple entries match '{}':", id);
            for entry in &matches {
                eprintln!("  {} - {}", entry.id, entry.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use quill_core::{MemoryStore, SequentialIds};

    fn store_with(titles: &[&str]) -> EntryStore {
        let mut store = EntryStore::open(MemoryStore::new())
            .with_id_generator(Box::new(SequentialIds::new("entry")));
        for title in titles {
            store.add(*title, "content long enough to pass", vec![]).unwrap();
        }
        store
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_resolve_id() {
        let store = store_with(&["a", "b", "c"]);
        assert_eq!(resolve_id("entry-2", &store).unwrap(), "entry-2");
        assert!(resolve_id("entry-", &store).is_err());
        assert!(resolve_id("nope", &store).is_err());
    }

    #[test]
    fn test_collect_tags() {
        let raw = vec!["life, work".to_string(), " ".to_string(), "travel".to_string()];
        assert_eq!(collect_tags(&raw), vec!["life", "work", "travel"]);
    }

    #[test]
    fn test_create_rejects_invalid_entry() {
        let mut store = store_with(&[]);
        let config = Config::default();

        let result = create(
            &mut store,
            &config,
            Some("  ".to_string()),
            Some("<p>tiny</p>".to_string()),
            vec![],
            &quiet(),
        );
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_and_edit_with_flags() {
        let mut store = store_with(&[]);
        let config = Config::default();

        create(
            &mut store,
            &config,
            Some(" Hello ".to_string()),
            Some("<p>This is my very first entry today.</p>".to_string()),
            vec!["life".to_string()],
            &quiet(),
        )
        .unwrap();
        let entry = store.entries()[0].clone();
        assert_eq!(entry.title, "Hello");
        assert_eq!(entry.tags, vec!["life"]);

        edit(
            &mut store,
            &config,
            entry.id.clone(),
            Some("Hello v2".to_string()),
            None,
            Some("".to_string()),
            &quiet(),
        )
        .unwrap();
        let edited = store.get(&entry.id).unwrap();
        assert_eq!(edited.title, "Hello v2");
        assert_eq!(edited.content, entry.content);
        assert!(edited.tags.is_empty());
        assert!(edited.last_edited_at.is_some());
    }

    #[test]
    fn test_delete_without_prompt_in_quiet_mode() {
        let mut store = store_with(&["a", "b"]);
        delete(&mut store, "entry-1".to_string(), false, &quiet()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("entry-1").is_none());
    }
}
