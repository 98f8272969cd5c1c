//! `lemon categories` command - List the distinct menu categories

use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::sync::file_source;
use crate::cli::helpers::{load_config, sync_manager};
use crate::cli::table::render_categories;
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct CategoriesArgs {
    /// Read the menu from a local JSON file if the cache is empty
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

pub fn run(args: CategoriesArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let manager = sync_manager(&config, file_source(args.from_file.as_deref()))?;
    let snapshot = manager.start()?;

    print!("{}", render_categories(&snapshot.categories, global.format)?);
    Ok(())
}
