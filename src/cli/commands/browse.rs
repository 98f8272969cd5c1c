//! `lemon browse` command - Interactive menu browser
//!
//! Reads commands from stdin, one per line:
//!
//! ```text
//! Pas              search by name (debounced)
//! :toggle mains    select or deselect a category
//! :categories      show the category chips
//! :clear           deselect everything and clear the search
//! :quit            leave
//! ```
//!
//! Category toggles refresh the results at once; search text only queries
//! after the input has been quiet for the debounce period.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cli::commands::sync::file_source;
use crate::cli::helpers::{load_config, sync_manager};
use crate::cli::table::{render_categories, render_items, MenuTableConfig};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Debouncer, MenuBrowser, MenuItem, QueryEngine, Trigger};

#[derive(clap::Args, Debug)]
pub struct BrowseArgs {
    /// Read the menu from a local JSON file if the cache is empty
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

enum Input<'a> {
    Quit,
    Clear,
    Categories,
    Toggle(&'a str),
    Search(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    match trimmed {
        ":quit" | ":q" => Input::Quit,
        ":clear" => Input::Clear,
        ":categories" => Input::Categories,
        _ => match trimmed.strip_prefix(":toggle ") {
            Some(label) => Input::Toggle(label.trim()),
            None => Input::Search(trimmed),
        },
    }
}

pub fn run(args: BrowseArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);

    // The blocking HTTP client must not run inside the async runtime
    let manager = sync_manager(&config, file_source(args.from_file.as_deref()))?;
    let snapshot = manager.start()?;
    let engine = QueryEngine::new(manager.store().clone());
    let browser = Arc::new(Mutex::new(MenuBrowser::new(engine, snapshot)));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .into_diagnostic()?;

    let format = global.format;
    let quiet = global.quiet;

    {
        let browser = lock(&browser);
        if !quiet {
            println!(
                "{} {} item(s). Type to search, :toggle LABEL, :clear, :quit",
                style("Little Lemon").bold(),
                browser.results().len()
            );
        }
        print!("{}", render_categories(browser.categories(), format)?);
        print_results(browser.results(), format, quiet);
    }

    let debouncer = {
        let browser = Arc::clone(&browser);
        Debouncer::with_handle(
            runtime.handle().clone(),
            config.debounce(),
            move |trigger: Trigger| {
                let mut browser = lock(&browser);
                // Text moved on while this trigger was in flight
                if browser.search_text() != trigger.text {
                    return;
                }
                match browser.search(trigger.text) {
                    Ok(items) => print_results(items, format, quiet),
                    Err(e) => tracing::warn!(error = %e, "search failed"),
                }
            },
        )
    };

    let stdin = io::stdin();
    let mut reached_eof = true;
    for line in stdin.lock().lines() {
        let line = line.into_diagnostic()?;
        match parse_input(&line) {
            Input::Quit => {
                reached_eof = false;
                break;
            }
            Input::Clear => {
                debouncer.cancel();
                let mut browser = lock(&browser);
                let items = browser.reset()?;
                print_results(items, format, quiet);
            }
            Input::Categories => {
                let browser = lock(&browser);
                print!("{}", render_categories(browser.categories(), format)?);
            }
            Input::Toggle(label) => {
                let mut browser = lock(&browser);
                if browser.toggle_category(label)? {
                    print!("{}", render_categories(browser.categories(), format)?);
                    print_results(browser.results(), format, quiet);
                } else {
                    eprintln!("{} unknown category '{}'", style("!").yellow(), label);
                }
            }
            Input::Search(text) => {
                lock(&browser).set_search_text(text);
                debouncer.on_text_changed(text);
            }
        }
    }

    // Piped input ends before the quiet period; let the last search land
    if reached_eof {
        let pending = debouncer.clone();
        let poll = config.debounce() / 10 + std::time::Duration::from_millis(1);
        runtime.block_on(async move {
            while pending.is_pending() {
                tokio::time::sleep(poll).await;
            }
        });
    }

    debouncer.cancel();
    Ok(())
}

fn print_results(items: &[MenuItem], format: OutputFormat, quiet: bool) {
    let table_config = MenuTableConfig {
        image_template: None,
        show_summary: !quiet,
    };
    match render_items(items, format, &table_config) {
        Ok(out) => print!("{}", out),
        Err(e) => tracing::warn!(error = %e, "failed to render results"),
    }
}

fn lock(browser: &Mutex<MenuBrowser>) -> MutexGuard<'_, MenuBrowser> {
    browser.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
