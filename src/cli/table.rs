//! Menu output formatting
//!
//! One renderer for every command that prints menu items or categories, so
//! `menu`, `sync` and `browse` agree on layout. Tables are for terminals;
//! TSV, CSV and JSON stay single-line per item for piping.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{image_url, truncate_str};
use crate::cli::OutputFormat;
use crate::core::{Category, MenuItem};

/// Column width for descriptions in table output
const DESCRIPTION_WIDTH: usize = 48;

/// Options for rendering menu items
#[derive(Debug, Clone)]
pub struct MenuTableConfig<'a> {
    /// Resolve and show photo URLs with this template
    pub image_template: Option<&'a str>,
    /// Show "N item(s)" after a table
    pub show_summary: bool,
}

impl Default for MenuTableConfig<'_> {
    fn default() -> Self {
        Self {
            image_template: None,
            show_summary: true,
        }
    }
}

#[derive(Serialize)]
struct ItemRow<'a> {
    name: &'a str,
    description: &'a str,
    price: String,
    category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

/// Render menu items in the requested format
pub fn render_items(items: &[MenuItem], format: OutputFormat, config: &MenuTableConfig) -> Result<String> {
    let rows: Vec<ItemRow> = items
        .iter()
        .map(|item| ItemRow {
            name: &item.name,
            description: &item.description,
            price: item.display_price(),
            category: &item.category,
            image_url: config.image_template.map(|t| image_url(t, &item.image)),
        })
        .collect();

    let mut header = vec!["Name", "Price", "Category", "Description"];
    if config.image_template.is_some() {
        header.push("Image");
    }

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&rows).into_diagnostic(),
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            {
                let mut writer = csv::Writer::from_writer(&mut buf);
                writer.write_record(&header).into_diagnostic()?;
                for row in &rows {
                    writer.write_record(record(row, false)).into_diagnostic()?;
                }
                writer.flush().into_diagnostic()?;
            }
            String::from_utf8(buf).into_diagnostic()
        }
        OutputFormat::Tsv => {
            let mut out = String::new();
            out.push_str(&header.join("\t"));
            out.push('\n');
            for row in &rows {
                let fields: Vec<String> = record(row, false)
                    .into_iter()
                    .map(|f| f.replace(['\t', '\n'], " "))
                    .collect();
                out.push_str(&fields.join("\t"));
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Md | OutputFormat::Auto => {
            let mut builder = Builder::default();
            builder.push_record(header);
            for row in &rows {
                builder.push_record(record(row, true));
            }
            let mut table = builder.build();
            if format == OutputFormat::Md {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }

            let mut out = table.to_string();
            out.push('\n');
            if config.show_summary {
                out.push_str(&format!("{} item(s)\n", rows.len()));
            }
            Ok(out)
        }
    }
}

fn record(row: &ItemRow, truncate: bool) -> Vec<String> {
    let description = if truncate {
        truncate_str(row.description, DESCRIPTION_WIDTH)
    } else {
        row.description.to_string()
    };
    let mut fields = vec![
        row.name.to_string(),
        row.price.clone(),
        row.category.to_string(),
        description,
    ];
    if let Some(ref url) = row.image_url {
        fields.push(url.clone());
    }
    fields
}

/// Render category chips in the requested format
pub fn render_categories(categories: &[Category], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(categories).into_diagnostic(),
        OutputFormat::Tsv | OutputFormat::Csv => {
            let mut out = String::new();
            for category in categories {
                out.push_str(&category.label);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Md | OutputFormat::Auto => {
            let mut out = String::new();
            for category in categories {
                out.push_str(&format!("{}\n", category));
            }
            Ok(out)
        }
    }
}
