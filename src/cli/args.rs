//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    browse::BrowseArgs, cache::CacheCommands, categories::CategoriesArgs,
    completions::CompletionsArgs, config::ConfigCommands, menu::MenuArgs, sync::SyncArgs,
};

#[derive(Parser)]
#[command(name = "lemon")]
#[command(author, version, about = "Little Lemon menu browser")]
#[command(long_about = "Sync the Little Lemon menu into a local cache and browse it by category and name.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Menu database (default: platform data dir, or LEMON_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the menu into the local cache (fetches only when the cache is empty)
    Sync(SyncArgs),

    /// List menu items, filtered by category and name
    Menu(MenuArgs),

    /// List menu categories
    Categories(CategoriesArgs),

    /// Interactive menu browser with debounced search
    Browse(BrowseArgs),

    /// Manage the local menu cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a terminal
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
