//! Light/dark theme preference
//!
//! Stored as the plain string `"light"` or `"dark"` under the theme key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageResult, THEME_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{}'. Use 'light' or 'dark'.", other)),
        }
    }
}

/// Read the saved theme; anything absent or unrecognized means light
pub fn load_theme(store: &dyn KeyValueStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_default(),
        Ok(None) => Theme::default(),
        Err(e) => {
            tracing::warn!("Could not read theme, using light: {}", e);
            Theme::default()
        }
    }
}

/// Persist the theme
pub fn save_theme(store: &mut dyn KeyValueStore, theme: Theme) -> StorageResult<()> {
    store.set(THEME_KEY, theme.as_str())
}

/// Flip the saved theme and return the new value
pub fn toggle_theme(store: &mut dyn KeyValueStore) -> StorageResult<Theme> {
    let next = load_theme(&*store).toggled();
    save_theme(store, next)?;
    Ok(next)
}
