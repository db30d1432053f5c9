//! Theme command handlers

use anyhow::{Context, Result};

use quill_core::theme::{load_theme, save_theme, toggle_theme};
use quill_core::{Config, FileStore, Theme};

use crate::output::{Output, OutputFormat};

/// Show the saved theme
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let theme = load_theme(&FileStore::new(&config.data_dir));
    print_theme(theme, output);
    Ok(())
}

/// Save a theme
pub fn set(config: &Config, value: String, output: &Output) -> Result<()> {
    let theme: Theme = value.parse().map_err(anyhow::Error::msg)?;
    let mut backend = FileStore::new(&config.data_dir);
    save_theme(&mut backend, theme).context("Failed to save theme")?;
    output.success(&format!("Theme set to {}", theme));
    Ok(())
}

/// Flip between light and dark
pub fn toggle(config: &Config, output: &Output) -> Result<()> {
    let mut backend = FileStore::new(&config.data_dir);
    let theme = toggle_theme(&mut backend).context("Failed to save theme")?;
    output.success(&format!("Switched to {} mode", theme));
    Ok(())
}

fn print_theme(theme: Theme, output: &Output) {
    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "theme": theme })),
        OutputFormat::Quiet | OutputFormat::Human => println!("{}", theme),
    }
}
