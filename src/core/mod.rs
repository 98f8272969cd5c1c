//! Core module - menu store, sync, queries and debounced search

pub mod browser;
pub mod config;
pub mod debounce;
pub mod error;
pub mod menu;
pub mod query;
pub mod remote;
pub mod store;
pub mod sync;

pub use browser::MenuBrowser;
pub use config::Config;
pub use debounce::{Debouncer, Trigger};
pub use error::MenuError;
pub use menu::{Category, MenuItem, MenuPayload};
pub use query::{QueryEngine, QuerySpec};
pub use remote::{FileMenuSource, HttpMenuSource, MenuSource};
pub use store::{CacheStats, MenuStore};
pub use sync::{MenuOrigin, MenuSnapshot, SyncManager, SyncPhase, SyncState};
