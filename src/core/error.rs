//! Error taxonomy for the menu core

use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the store, the remote source and the sync manager
#[derive(Debug, Error, Diagnostic)]
pub enum MenuError {
    /// The menu table could not be created. Nothing else can work.
    #[error("failed to prepare the menu store schema")]
    #[diagnostic(
        code(lemon::store::schema),
        help("check that the database path is writable, or remove it with `lemon cache clear`")
    )]
    Schema(#[source] rusqlite::Error),

    /// The database could not be opened or read outside of a query
    #[error("menu store error: {0}")]
    #[diagnostic(code(lemon::store::io))]
    Store(#[source] rusqlite::Error),

    /// The remote menu could not be fetched or decoded
    #[error("failed to fetch menu from {origin}: {reason}")]
    #[diagnostic(
        code(lemon::remote::fetch),
        help("the menu stays empty until the next successful sync (`lemon sync`)")
    )]
    Fetch { origin: String, reason: String },

    /// A filtered query failed; stored data is unaffected
    #[error("menu query failed")]
    #[diagnostic(code(lemon::query))]
    Query(#[source] rusqlite::Error),

    /// Writing the fetched menu failed; the batch was rolled back
    #[error("failed to store menu item #{index}")]
    #[diagnostic(
        code(lemon::store::insert),
        help("the local cache was left unchanged; run `lemon sync --force` to retry")
    )]
    Insert {
        index: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// Another sync is still running against this store
    #[error("a menu sync is already in progress")]
    #[diagnostic(code(lemon::sync::in_flight))]
    SyncInFlight,

    #[error("I/O error: {0}")]
    #[diagnostic(code(lemon::io))]
    Io(#[from] std::io::Error),

    /// Configuration could not be read or is invalid
    #[error("configuration error: {0}")]
    #[diagnostic(code(lemon::config))]
    Config(String),
}

impl MenuError {
    /// Build a fetch error from anything displayable
    pub fn fetch(origin: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        MenuError::Fetch {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }

    /// Recoverable errors leave the app usable with empty or stale data
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MenuError::Schema(_) | MenuError::Config(_))
    }
}
