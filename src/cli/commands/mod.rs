//! CLI command implementations

pub mod browse;
pub mod cache;
pub mod categories;
pub mod completions;
pub mod config;
pub mod menu;
pub mod sync;
