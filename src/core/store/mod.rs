//! SQLite-backed local menu store
//!
//! This module provides the local cache that:
//! - Holds the last synced menu in a single `menus` table
//! - Derives the distinct category list in first-seen order
//! - Answers category + text queries for the query engine
//! - Records when and from where the menu was last synced
//!
//! The store is disposable: on a schema version mismatch it is dropped and
//! recreated, and the next sync repopulates it.

mod queries;
mod schema;
mod types;

pub use types::*;

use types::{META_LAST_SYNCED, META_ORIGIN, META_PAYLOAD_SHA256};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};

use crate::core::error::MenuError;
use crate::core::menu::{check_price_precision, MenuItem};

/// Current schema version - tables are rebuilt on version mismatch
const SCHEMA_VERSION: i32 = 1;

/// The local menu store
///
/// All statements go through one connection guarded by a mutex, so a store
/// shared behind an `Arc` serializes its writes.
pub struct MenuStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl MenuStore {
    /// Open (or create) a store file. The schema is created lazily by
    /// [`MenuStore::ensure_schema`].
    pub fn open(path: &Path) -> Result<Self, MenuError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(MenuError::Store)?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(MenuError::Store)?;

        tracing::debug!(path = %path.display(), "opened menu store");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a throwaway store (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, MenuError> {
        let conn = Connection::open_in_memory().map_err(MenuError::Store)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Location of the database file, if file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock leaves SQLite itself consistent
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append items to the store inside a single transaction.
    ///
    /// A failing item rolls the whole batch back.
    pub fn insert_all(&self, items: &[MenuItem]) -> Result<usize, MenuError> {
        let mut conn = self.conn();
        let tx = conn.transaction().map_err(MenuError::Store)?;
        insert_rows(&tx, items)?;
        tx.commit().map_err(MenuError::Store)?;

        tracing::debug!(count = items.len(), "inserted menu items");
        Ok(items.len())
    }

    /// Replace every stored item with `items` atomically
    pub fn replace_all(&self, items: &[MenuItem]) -> Result<usize, MenuError> {
        let mut conn = self.conn();
        let tx = conn.transaction().map_err(MenuError::Store)?;
        tx.execute("DELETE FROM menus", []).map_err(MenuError::Store)?;
        insert_rows(&tx, items)?;
        tx.commit().map_err(MenuError::Store)?;

        tracing::debug!(count = items.len(), "replaced menu items");
        Ok(items.len())
    }

    /// Remember where the current menu came from
    pub fn record_sync(&self, origin: &str, payload: &[u8]) -> Result<(), MenuError> {
        let synced_at = chrono::Utc::now().to_rfc3339();
        let hash = compute_hash(payload);

        let conn = self.conn();
        for (key, value) in [
            (META_LAST_SYNCED, synced_at.as_str()),
            (META_ORIGIN, origin),
            (META_PAYLOAD_SHA256, hash.as_str()),
        ] {
            conn.execute(
                "INSERT OR REPLACE INTO cache_meta (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(MenuError::Store)?;
        }
        Ok(())
    }
}

fn insert_rows(tx: &rusqlite::Transaction<'_>, items: &[MenuItem]) -> Result<(), MenuError> {
    let mut stmt = tx
        .prepare(
            "INSERT INTO menus (name, description, price, category, image) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(|source| MenuError::Insert { index: 0, source })?;

    for (index, item) in items.iter().enumerate() {
        check_price_precision(item.price).map_err(|e| MenuError::Insert {
            index,
            source: rusqlite::Error::ToSqlConversionFailure(Box::new(e)),
        })?;

        // Bound as text; the REAL column affinity stores it numerically
        stmt.execute(params![
            item.name,
            item.description,
            item.price.to_string(),
            item.category,
            item.image,
        ])
        .map_err(|source| MenuError::Insert { index, source })?;
    }
    Ok(())
}

/// Compute SHA256 hash of a payload
fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn item(name: &str, category: &str) -> MenuItem {
        MenuItem::new(name, format!("{} description", name), dec!(9.50), category, format!("{}.jpg", name))
    }

    fn seeded_store(items: &[MenuItem]) -> MenuStore {
        let store = MenuStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store.insert_all(items).unwrap();
        store
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let store = MenuStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_insert_and_select_all_preserves_order() {
        let items = vec![item("Greek Salad", "starters"), item("Pasta", "mains"), item("Bruschetta", "starters")];
        let store = seeded_store(&items);

        let rows = store.select_all().unwrap();
        assert_eq!(rows, items);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_prices_survive_storage_exactly() {
        let mut soup = item("Soup", "mains");
        soup.price = dec!(12.99);
        let mut water = item("Water", "drinks");
        water.price = dec!(2);
        let store = seeded_store(&[soup, water]);

        let rows = store.select_all().unwrap();
        assert_eq!(rows[0].price, dec!(12.99));
        assert_eq!(rows[1].price, dec!(2));
    }

    #[test]
    fn test_fifteen_digit_prices_round_trip() {
        let mut banquet = item("Banquet", "specials");
        banquet.price = dec!(1234567890.12345);
        let store = seeded_store(&[banquet]);

        assert_eq!(store.select_all().unwrap()[0].price, dec!(1234567890.12345));
    }

    #[test]
    fn test_price_beyond_real_precision_is_rejected() {
        let mut caviar = item("Caviar", "specials");
        caviar.price = dec!(1234567890.123456789);
        let store = seeded_store(&[item("Pasta", "mains")]);

        let err = store.insert_all(&[item("Soup", "mains"), caviar]).unwrap_err();

        assert!(matches!(err, MenuError::Insert { index: 1, .. }));
        let names: Vec<String> = store.select_all().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Pasta"]);
    }

    #[test]
    fn test_distinct_categories_first_occurrence_order() {
        let store = seeded_store(&[
            item("Chowder", "Soups"),
            item("Minestrone", "Soups"),
            item("Caesar", "Salads"),
            item("Chef Special", "Specialty"),
        ]);

        let categories = store.select_distinct_categories().unwrap();
        assert_eq!(categories, vec!["Soups", "Salads", "Specialty"]);
    }

    #[test]
    fn test_insert_without_schema_fails_with_insert_error() {
        let store = MenuStore::open_in_memory().unwrap();
        let err = store.insert_all(&[item("Soup", "mains")]).unwrap_err();
        assert!(matches!(err, MenuError::Insert { index: 0, .. }));
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let store = seeded_store(&[item("Existing", "mains")]);
        {
            let conn = store.conn();
            conn.execute_batch(
                "CREATE TRIGGER reject_poison BEFORE INSERT ON menus
                 WHEN NEW.name = 'Poison'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();
        }

        let err = store
            .insert_all(&[item("Fine", "mains"), item("Poison", "mains"), item("Later", "mains")])
            .unwrap_err();

        assert!(matches!(err, MenuError::Insert { index: 1, .. }));
        let names: Vec<String> = store.select_all().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Existing"]);
    }

    #[test]
    fn test_replace_all_swaps_contents() {
        let store = seeded_store(&[item("Old", "mains")]);
        store.replace_all(&[item("New A", "starters"), item("New B", "desserts")]).unwrap();

        let names: Vec<String> = store.select_all().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["New A", "New B"]);
        assert_eq!(store.select_distinct_categories().unwrap(), vec!["starters", "desserts"]);
    }

    #[test]
    fn test_file_store_persists_and_reports_statistics() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/menu.db");

        {
            let store = MenuStore::open(&path).unwrap();
            store.ensure_schema().unwrap();
            store.insert_all(&[item("Pasta", "mains")]).unwrap();
            store.record_sync("file:///menu.json", b"{}").unwrap();
        }

        let store = MenuStore::open(&path).unwrap();
        store.ensure_schema().unwrap();
        let stats = store.statistics().unwrap();
        assert_eq!(stats.total_items, 1);
        assert_eq!(stats.total_categories, 1);
        assert_eq!(stats.origin.as_deref(), Some("file:///menu.json"));
        assert_eq!(stats.payload_sha256.as_deref().map(str::len), Some(64));
        assert!(stats.last_synced.is_some());
        assert!(stats.db_size_bytes > 0);
    }

    #[test]
    fn test_unreadable_schema_version_is_schema_error() {
        let store = MenuStore::open_in_memory().unwrap();
        store
            .conn()
            .execute_batch(
                "CREATE TABLE schema_version (version TEXT);
                 INSERT INTO schema_version VALUES ('corrupt');",
            )
            .unwrap();

        let err = store.ensure_schema().unwrap_err();
        assert!(matches!(err, MenuError::Schema(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_schema_version_mismatch_rebuilds_tables() {
        let store = seeded_store(&[item("Pasta", "mains")]);
        store
            .conn()
            .execute("UPDATE schema_version SET version = 0", [])
            .unwrap();

        store.ensure_schema().unwrap();
        assert!(store.is_empty().unwrap());
    }
}
