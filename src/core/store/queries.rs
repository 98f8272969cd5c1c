//! Read paths over the menu table
//!
//! Rows always come back in row id order, which is the order the menu was
//! synced in.

use std::fs;

use rusqlite::{params_from_iter, OptionalExtension, Row};

use super::types::{parse_datetime, META_LAST_SYNCED, META_ORIGIN, META_PAYLOAD_SHA256};
use super::{CacheStats, MenuStore};
use crate::core::error::MenuError;
use crate::core::menu::{parse_price, MenuItem};

/// Column list shared by every item query. The price is read back as text
/// so it converts to `Decimal` without passing through `f64`.
const ITEM_COLUMNS: &str = "COALESCE(name, ''), COALESCE(description, ''), \
     COALESCE(CAST(price AS TEXT), '0'), COALESCE(category, ''), COALESCE(image, '')";

impl MenuStore {
    /// Every stored item (the cache-hit path)
    pub fn select_all(&self) -> Result<Vec<MenuItem>, MenuError> {
        let sql = format!("SELECT {} FROM menus ORDER BY id", ITEM_COLUMNS);
        self.select_items(&sql, Vec::new()).map_err(MenuError::Store)
    }

    /// Distinct category labels in the order they first appear
    pub fn select_distinct_categories(&self) -> Result<Vec<String>, MenuError> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT COALESCE(category, '') FROM menus GROUP BY category ORDER BY MIN(id)",
            )
            .map_err(MenuError::Store)?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(MenuError::Store)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(MenuError::Store)
    }

    /// Items filtered by category set and name substring.
    ///
    /// - categories and text: category in set AND name contains text
    /// - categories only: category in set
    /// - text only: name contains text, any category
    /// - neither: everything
    ///
    /// Name matching is a literal, case-sensitive substring test.
    pub fn query(&self, categories: &[String], text: &str) -> Result<Vec<MenuItem>, MenuError> {
        let mut sql = format!("SELECT {} FROM menus", ITEM_COLUMNS);
        let mut params: Vec<String> = Vec::new();

        if !categories.is_empty() || !text.is_empty() {
            sql.push_str(" WHERE");
            if !categories.is_empty() {
                let placeholders = vec!["?"; categories.len()].join(",");
                sql.push_str(&format!(" category IN ({})", placeholders));
                params.extend(categories.iter().cloned());
                if !text.is_empty() {
                    sql.push_str(" AND instr(name, ?) > 0");
                    params.push(text.to_string());
                }
            } else {
                sql.push_str(" instr(name, ?) > 0");
                params.push(text.to_string());
            }
        }
        sql.push_str(" ORDER BY id");

        tracing::debug!(%sql, params = ?params, "menu query");
        self.select_items(&sql, params).map_err(MenuError::Query)
    }

    /// True when no menu has been synced yet
    pub fn is_empty(&self) -> Result<bool, MenuError> {
        Ok(self.count()? == 0)
    }

    /// Number of stored items
    pub fn count(&self) -> Result<usize, MenuError> {
        self.conn()
            .query_row("SELECT COUNT(*) FROM menus", [], |row| row.get(0))
            .map_err(MenuError::Store)
    }

    /// Store statistics
    pub fn statistics(&self) -> Result<CacheStats, MenuError> {
        let total_items = self.count()?;
        let total_categories = self.select_distinct_categories()?.len();

        let meta = |key: &str| -> Result<Option<String>, MenuError> {
            self.conn()
                .query_row(
                    "SELECT value FROM cache_meta WHERE key = ?1",
                    [key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(MenuError::Store)
        };

        let last_synced = meta(META_LAST_SYNCED)?.and_then(|s| parse_datetime(&s));
        let origin = meta(META_ORIGIN)?;
        let payload_sha256 = meta(META_PAYLOAD_SHA256)?;

        let db_size_bytes = self
            .path()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(CacheStats {
            total_items,
            total_categories,
            last_synced,
            origin,
            payload_sha256,
            db_size_bytes,
        })
    }

    fn select_items(&self, sql: &str, params: Vec<String>) -> rusqlite::Result<Vec<MenuItem>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(params), item_from_row)?;
        rows.collect()
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<MenuItem> {
    let price_text: String = row.get(2)?;
    let price = parse_price(&price_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(MenuItem {
        name: row.get(0)?,
        description: row.get(1)?,
        price,
        category: row.get(3)?,
        image: row.get(4)?,
    })
}
