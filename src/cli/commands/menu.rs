//! `lemon menu` command - List menu items with category and name filters

use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::sync::file_source;
use crate::cli::helpers::{load_config, sync_manager};
use crate::cli::table::{render_items, MenuTableConfig};
use crate::cli::GlobalOpts;
use crate::core::{QueryEngine, QuerySpec};

#[derive(clap::Args, Debug)]
pub struct MenuArgs {
    /// Only show these categories (comma-separated, exact labels)
    #[arg(long, short = 'c', value_delimiter = ',')]
    pub category: Vec<String>,

    /// Only show dishes whose name contains this text (case-sensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Include resolved photo URLs
    #[arg(long)]
    pub images: bool,

    /// Read the menu from a local JSON file if the cache is empty
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

pub fn run(args: MenuArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let manager = sync_manager(&config, file_source(args.from_file.as_deref()))?;
    let snapshot = manager.start()?;

    let spec = QuerySpec::new(args.category, args.search.unwrap_or_default());
    let items = if spec.is_unfiltered() {
        snapshot.items
    } else {
        QueryEngine::new(manager.store().clone()).run(&spec)?
    };

    let template = config.image_url_template().to_string();
    let table_config = MenuTableConfig {
        image_template: args.images.then_some(template.as_str()),
        show_summary: !global.quiet,
    };
    print!("{}", render_items(&items, global.format, &table_config)?);

    Ok(())
}
