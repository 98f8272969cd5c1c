//! `lemon cache` command - Manage the local menu cache
//!
//! The cache is a SQLite database holding the last synced menu. It is only
//! filled when empty; `rebuild` forces a fresh fetch and `clear` removes the
//! file so the next command starts over.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::commands::sync::file_source;
use crate::cli::helpers::{load_config, open_store, sync_manager};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Fetch the menu again and replace the cached copy
    Rebuild {
        /// Read the menu from a local JSON file instead of the remote URL
        #[arg(long, value_name = "PATH")]
        from_file: Option<PathBuf>,
    },

    /// Delete the cache database
    Clear,
}

pub fn run(cmd: CacheCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CacheCommands::Status => run_status(global),
        CacheCommands::Rebuild { from_file } => run_rebuild(from_file.as_deref(), global),
        CacheCommands::Clear => run_clear(global),
    }
}

fn run_status(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let store = open_store(&config)?;
    store.ensure_schema()?;
    let stats = store.statistics()?;

    if global.format == OutputFormat::Json {
        let value = serde_json::json!({
            "location": config.db_path()?.display().to_string(),
            "items": stats.total_items,
            "categories": stats.total_categories,
            "last_synced": stats.last_synced.map(|t| t.to_rfc3339()),
            "origin": stats.origin,
            "payload_sha256": stats.payload_sha256,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
        return Ok(());
    }

    println!("{}", style("Cache Status").bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Location:       {}", config.db_path()?.display());
    println!("  Menu items:     {}", style(stats.total_items).cyan());
    println!("  Categories:     {}", style(stats.total_categories).cyan());
    println!(
        "  Database size:  {} KB",
        style(stats.db_size_bytes / 1024).cyan()
    );
    match stats.last_synced {
        Some(ts) => println!("  Last synced:    {}", ts.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  Last synced:    {}", style("never").dim()),
    }
    if let Some(origin) = stats.origin {
        println!("  Origin:         {}", origin);
    }

    Ok(())
}

fn run_rebuild(from_file: Option<&Path>, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let manager = sync_manager(&config, file_source(from_file))?;

    if !global.quiet {
        println!("{} Rebuilding menu cache...", style("→").blue());
    }
    let snapshot = manager.resync()?;

    println!(
        "{} Cache rebuilt: {} item(s), {} categories",
        style("✓").green(),
        style(snapshot.items.len()).cyan(),
        style(snapshot.categories.len()).cyan()
    );
    Ok(())
}

fn run_clear(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let db_path = config.db_path()?;

    if db_path.exists() {
        std::fs::remove_file(&db_path)
            .map_err(|e| miette::miette!("Failed to remove cache: {}", e))?;

        // Also remove WAL and journal files if they exist
        for suffix in ["-journal", "-wal", "-shm"] {
            let mut sidecar = db_path.clone().into_os_string();
            sidecar.push(suffix);
            let _ = std::fs::remove_file(PathBuf::from(sidecar));
        }

        println!("{} Cache cleared", style("✓").green());
    } else {
        println!("No cache to clear");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MenuItem, MenuStore};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn global_for(db: &Path) -> GlobalOpts {
        GlobalOpts {
            format: OutputFormat::Tsv,
            quiet: true,
            verbose: false,
            db: Some(db.to_path_buf()),
        }
    }

    #[test]
    fn test_cache_clear_removes_database() {
        let tmp = tempdir().unwrap();
        let db = tmp.path().join("menu.db");
        {
            let store = MenuStore::open(&db).unwrap();
            store.ensure_schema().unwrap();
            store
                .insert_all(&[MenuItem::new("Pasta", "", dec!(18.99), "mains", "pasta.jpg")])
                .unwrap();
        }
        assert!(db.exists());

        run_clear(&global_for(&db)).unwrap();
        assert!(!db.exists());
    }

    #[test]
    fn test_cache_clear_without_database() {
        let tmp = tempdir().unwrap();
        let db = tmp.path().join("missing.db");
        run_clear(&global_for(&db)).unwrap();
        assert!(!db.exists());
    }

    #[test]
    fn test_cache_rebuild_from_file() {
        let tmp = tempdir().unwrap();
        let db = tmp.path().join("menu.db");
        let menu = tmp.path().join("menu.json");
        std::fs::write(
            &menu,
            r#"{"menu":[{"name":"Bruschetta","description":"","price":"7.99","category":"starters","image":"b.jpg"}]}"#,
        )
        .unwrap();

        run_rebuild(Some(&menu), &global_for(&db)).unwrap();

        let store = MenuStore::open(&db).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
