//! Database schema initialization

use rusqlite::{params, OptionalExtension};

use super::{MenuStore, SCHEMA_VERSION};
use crate::core::error::MenuError;

impl MenuStore {
    /// Create the menu tables if they do not exist yet.
    ///
    /// Safe to call on every start. A store written by an older schema
    /// version is dropped and recreated empty.
    pub fn ensure_schema(&self) -> Result<(), MenuError> {
        let conn = self.conn();

        // Missing table reads as "no version yet"; any other failure is a
        // damaged store
        let has_version_table: bool = conn
            .query_row(
                "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(MenuError::Schema)?;

        let current_version: Option<i32> = if has_version_table {
            conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
                .optional()
                .map_err(MenuError::Schema)?
        } else {
            None
        };

        if let Some(version) = current_version {
            if version != SCHEMA_VERSION {
                tracing::info!(
                    found = version,
                    expected = SCHEMA_VERSION,
                    "menu store schema changed, rebuilding"
                );
                conn.execute_batch(
                    r#"
                    DROP TABLE IF EXISTS schema_version;
                    DROP TABLE IF EXISTS menus;
                    DROP TABLE IF EXISTS cache_meta;
                    "#,
                )
                .map_err(MenuError::Schema)?;
            }
        }

        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Menu items, in the order they were synced
            CREATE TABLE IF NOT EXISTS menus (
                id INTEGER PRIMARY KEY NOT NULL,
                name TEXT,
                description TEXT,
                price REAL,
                category TEXT,
                image TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_menus_category ON menus(category);

            -- Sync bookkeeping (last sync time, origin, payload hash)
            CREATE TABLE IF NOT EXISTS cache_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(MenuError::Schema)?;

        conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )
        .map_err(MenuError::Schema)?;

        Ok(())
    }
}
