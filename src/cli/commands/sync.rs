//! `lemon sync` command - Load the menu into the local cache

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_config, sync_manager};
use crate::cli::table::render_categories;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{FileMenuSource, MenuOrigin, MenuSnapshot, MenuSource};

#[derive(clap::Args, Debug)]
pub struct SyncArgs {
    /// Read the menu from a local JSON file instead of the remote URL
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Fetch even if the cache is populated, replacing its contents
    #[arg(long)]
    pub force: bool,
}

/// Build the file source requested by `--from-file`, if any
pub fn file_source(path: Option<&std::path::Path>) -> Option<Box<dyn MenuSource>> {
    path.map(|p| Box::new(FileMenuSource::new(p)) as Box<dyn MenuSource>)
}

pub fn run(args: SyncArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let manager = sync_manager(&config, file_source(args.from_file.as_deref()))?;

    let snapshot = if args.force {
        manager.resync()?
    } else {
        manager.start()?
    };

    if global.format == OutputFormat::Json {
        print_json(&snapshot);
        return Ok(());
    }

    if !global.quiet {
        let how = match snapshot.origin {
            MenuOrigin::Cache => "Menu already cached",
            MenuOrigin::Remote => "Menu synced",
        };
        println!(
            "{} {}: {} item(s) in {} categor{}",
            style("✓").green(),
            how,
            style(snapshot.items.len()).cyan(),
            style(snapshot.categories.len()).cyan(),
            if snapshot.categories.len() == 1 { "y" } else { "ies" }
        );
    }
    print!("{}", render_categories(&snapshot.categories, global.format)?);

    Ok(())
}

fn print_json(snapshot: &MenuSnapshot) {
    let origin = match snapshot.origin {
        MenuOrigin::Cache => "cache",
        MenuOrigin::Remote => "remote",
    };
    let labels: Vec<&str> = snapshot.categories.iter().map(|c| c.label.as_str()).collect();
    let value = serde_json::json!({
        "origin": origin,
        "items": snapshot.items.len(),
        "categories": labels,
    });
    println!("{}", value);
}
