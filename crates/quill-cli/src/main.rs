//! Quill CLI
//!
//! Command-line interface for Quill - a local journal of titled posts.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quill_core::{Config, EntryStore, StoreError};

mod commands;
mod editor;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill - write, edit and back up journal posts")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a new entry
    #[command(alias = "new")]
    Add {
        /// Entry title (prompted if not provided)
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Entry content as HTML (opens editor if not provided)
        #[arg(short, long)]
        content: Option<String>,
        /// Tags to add (repeatable, or comma-separated)
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// List entries, newest first
    #[command(alias = "ls")]
    List {
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show an entry
    Show {
        /// Entry ID (full ID or prefix)
        id: String,
    },
    /// Edit an entry
    Edit {
        /// Entry ID (full ID or prefix)
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
        /// Replace tags (comma-separated, empty to clear)
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Entry ID (full ID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export all entries to a JSON file
    Export {
        /// Output file (`-` for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import entries from a JSON file, skipping ids already present
    Import {
        /// File produced by `quill export`
        file: PathBuf,
    },
    /// List all tags
    Tags,
    /// Show or change the colour theme
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
    /// Show storage and settings overview
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ThemeCommands {
    /// Show the saved theme
    Show,
    /// Set the theme
    Set {
        /// light or dark
        theme: String,
    },
    /// Switch between light and dark
    Toggle,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, min_content_length, id_strategy, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = e
            .downcast_ref::<StoreError>()
            .and_then(StoreError::recovery_suggestion)
        {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Commands that don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config = Config::load_with_cli_override(config_path)?;
    init_logging(&config);

    if let Commands::Theme { command } = &cli.command {
        return handle_theme_command(command.clone(), &config, &output);
    }

    let mut store = EntryStore::open_with_config(&config);
    info!(entries = store.len(), data_dir = ?config.data_dir, "Store opened");

    match cli.command {
        Commands::Add {
            title,
            content,
            tag,
        } => commands::entry::create(&mut store, &config, title, content, tag, &output),
        Commands::List { tag } => commands::entry::list(&store, tag, &output),
        Commands::Show { id } => commands::entry::show(&store, id, &output),
        Commands::Edit {
            id,
            title,
            content,
            tags,
        } => commands::entry::edit(&mut store, &config, id, title, content, tags, &output),
        Commands::Delete { id, yes } => commands::entry::delete(&mut store, id, yes, &output),
        Commands::Export { output: path } => commands::transfer::export(&store, path, &output),
        Commands::Import { file } => commands::transfer::import(&mut store, file, &output),
        Commands::Tags => commands::tag::list(&store, &output),
        Commands::Status => commands::status::show(&store, &config, &output),
        Commands::Theme { .. } | Commands::Config { .. } => unreachable!(),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

fn handle_theme_command(
    command: Option<ThemeCommands>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ThemeCommands::Show) | None => commands::theme::show(config, output),
        Some(ThemeCommands::Set { theme }) => commands::theme::set(config, theme, output),
        Some(ThemeCommands::Toggle) => commands::theme::toggle(config, output),
    }
}

/// Initialize logging
///
/// Only initializes if QUILL_LOG is set. Logs are appended to
/// `config.log_file` (default {data_dir}/debug.log), falling back to stderr
/// when the file can't be opened.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("QUILL_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("quill_core={},quill_cli={}", log_level, log_level));
    let log_path = config.log_path();

    match open_log_file(&log_path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(file)
                .try_init();
            info!("Logging to {:?}", log_path);
        }
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

/// Open `path` for appending, creating its directory first
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
