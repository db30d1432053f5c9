//! Entry validation
//!
//! Checks a candidate title/content pair before the store accepts it.
//! Content length is always measured on the plain-text projection of the
//! markup, never on the raw markup.

use scraper::Html;
use serde::Serialize;

/// Default minimum plain-text content length
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 20;

/// Message shown when the title is blank
pub const TITLE_REQUIRED: &str = "Title is required.";

/// Per-field error messages (empty string when the field passed)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub title: String,
    pub content: String,
}

/// Result of validating a candidate entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: FieldErrors,
}

impl Validation {
    /// Field messages that are actually set, in display order
    pub fn messages(&self) -> Vec<&str> {
        [self.errors.title.as_str(), self.errors.content.as_str()]
            .into_iter()
            .filter(|m| !m.is_empty())
            .collect()
    }
}

/// Validate a title and the plain-text projection of its content
///
/// `min_content_length` is counted in characters and clamped to at least 1,
/// so whitespace-only content never passes.
pub fn validate(title: &str, plain_text_content: &str, min_content_length: usize) -> Validation {
    let min = min_content_length.max(1);
    let mut errors = FieldErrors::default();

    if title.trim().is_empty() {
        errors.title = TITLE_REQUIRED.to_string();
    }

    let content_len = plain_text_content.trim().chars().count();
    if content_len < min {
        errors.content = content_error(min);
    }

    Validation {
        valid: errors.title.is_empty() && errors.content.is_empty(),
        errors,
    }
}

/// Validate a title against raw content markup
pub fn validate_markup(title: &str, markup: &str, min_content_length: usize) -> Validation {
    validate(title, &plain_text(markup), min_content_length)
}

fn content_error(min: usize) -> String {
    if min == 1 {
        "Content cannot be empty.".to_string()
    } else {
        format!("Content must be at least {} characters.", min)
    }
}

/// Project rich-text markup to its plain text
///
/// Parses `markup` as an HTML fragment and concatenates its text nodes, so
/// tags and comments drop out and every character reference decodes to the
/// character it names. Non-breaking spaces become plain spaces.
pub fn plain_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .replace('\u{a0}', " ")
}
