//! Little Lemon: menu sync and search core
//!
//! Keeps a local SQLite copy of the restaurant's remote JSON menu and
//! answers category + text queries against it, with debounced search input.
//! The `lemon` binary is a terminal front end over the same core.

pub mod cli;
pub mod core;
