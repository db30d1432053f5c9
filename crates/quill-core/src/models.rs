//! Data models for Quill
//!
//! Defines the journal `Entry` and the helpers used to build its tag list
//! from raw user input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A journal/blog post
///
/// Serialized with camelCase field names; this is both the persisted shape
/// under the entries key and the export/import file format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique identifier within a collection
    pub id: String,
    /// Post title (never blank once persisted)
    pub title: String,
    /// Rich-text markup, stored as given
    pub content: String,
    /// Tags for organization
    #[serde(default)]
    pub tags: Vec<String>,
    /// When this entry was created
    pub created_at: DateTime<Utc>,
    /// When this entry was last edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Create a new entry with the given id and creation time
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags,
            created_at,
            last_edited_at: None,
        }
    }

    /// Rewrite the editable fields and stamp the edit time
    ///
    /// The stamp is clamped so it never precedes `created_at`.
    pub fn apply_edit(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) {
        self.title = title.into();
        self.content = content.into();
        self.tags = tags;
        self.last_edited_at = Some(now.max(self.created_at));
    }

    /// Check whether this entry carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Most recent modification time (edit time, or creation time)
    pub fn touched_at(&self) -> DateTime<Utc> {
        self.last_edited_at.unwrap_or(self.created_at)
    }
}

/// Split a raw comma-separated tag string into a clean tag list
///
/// Each piece is trimmed and empty pieces are dropped; order is kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trim and drop empty tags from an already-split list
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_entry_new() {
        let entry = Entry::new("e1", "Hello", "<p>Body</p>", vec![], fixed_time());
        assert_eq!(entry.id, "e1");
        assert_eq!(entry.title, "Hello");
        assert!(entry.tags.is_empty());
        assert!(entry.last_edited_at.is_none());
        assert_eq!(entry.touched_at(), fixed_time());
    }

    #[test]
    fn test_apply_edit_stamps_time() {
        let mut entry = Entry::new("e1", "Hello", "Body", vec!["a".into()], fixed_time());
        let later = fixed_time() + Duration::minutes(5);
        entry.apply_edit("Hello v2", "New body", vec![], later);

        assert_eq!(entry.id, "e1");
        assert_eq!(entry.created_at, fixed_time());
        assert_eq!(entry.title, "Hello v2");
        assert_eq!(entry.content, "New body");
        assert!(entry.tags.is_empty());
        assert_eq!(entry.last_edited_at, Some(later));
    }

    #[test]
    fn test_apply_edit_never_before_creation() {
        let mut entry = Entry::new("e1", "Hello", "Body", vec![], fixed_time());
        let earlier = fixed_time() - Duration::hours(1);
        entry.apply_edit("Hello", "Body", vec![], earlier);
        assert_eq!(entry.last_edited_at, Some(fixed_time()));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("life, work ,,  travel "), vec!["life", "work", "travel"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(normalize_tags(["  rust", "", "cli "]), vec!["rust", "cli"]);
    }

    #[test]
    fn test_serialization_field_names() {
        let entry = Entry::new("e1", "Hello", "Body", vec!["life".into()], fixed_time());
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("lastEditedAt").is_none());

        let mut edited = entry.clone();
        edited.apply_edit("Hi", "Body", vec![], fixed_time() + Duration::seconds(1));
        let json = serde_json::to_value(&edited).unwrap();
        assert!(json.get("lastEditedAt").is_some());

        let back: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(back, edited);
    }
}
