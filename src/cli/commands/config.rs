//! `lemon config` command - Configuration inspection
//!
//! Shows the effective configuration after merging the global file,
//! `LEMON_*` environment variables and command-line flags.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::load_config;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show,

    /// Show the path to the global configuration file
    Path,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let db_path = config.db_path()?;
    let debounce_ms = config.debounce().as_millis() as u64;

    if global.format == OutputFormat::Json {
        let value = serde_json::json!({
            "menu_url": config.menu_url(),
            "db_path": db_path.display().to_string(),
            "image_url_template": config.image_url_template(),
            "debounce_ms": debounce_ms,
        });
        println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    print_config_value("menu_url", config.menu_url(), config.menu_url.is_none());
    print_config_value(
        "db_path",
        &db_path.display().to_string(),
        config.db_path.is_none(),
    );
    print_config_value(
        "image_url_template",
        config.image_url_template(),
        config.image_url_template.is_none(),
    );
    print_config_value(
        "debounce_ms",
        &debounce_ms.to_string(),
        config.debounce_ms.is_none(),
    );

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--db)");
    println!("  2. Environment variables (LEMON_MENU_URL, LEMON_DB, LEMON_IMAGE_URL, LEMON_DEBOUNCE_MS)");
    println!("  3. Global config (~/.config/little-lemon/config.yaml)");

    Ok(())
}

fn run_path() -> Result<()> {
    let path = Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))?;

    println!("{}", path.display());
    if path.exists() {
        println!("  {}", style("(exists)").green());
    } else {
        println!("  {}", style("(not created)").dim());
    }
    Ok(())
}

fn print_config_value(key: &str, value: &str, is_default: bool) {
    if is_default {
        println!(
            "  {}: {} {}",
            style(key).cyan(),
            style(value).yellow(),
            style("(default)").dim()
        );
    } else {
        println!("  {}: {}", style(key).cyan(), style(value).yellow());
    }
}
