//! Store type definitions

use chrono::{DateTime, Utc};

pub(super) const META_LAST_SYNCED: &str = "last_synced";
pub(super) const META_ORIGIN: &str = "origin";
pub(super) const META_PAYLOAD_SHA256: &str = "payload_sha256";

/// Store statistics for `lemon cache status`
#[derive(Debug, Default)]
pub struct CacheStats {
    pub total_items: usize,
    pub total_categories: usize,
    pub last_synced: Option<DateTime<Utc>>,
    /// URL or file path the current menu was synced from
    pub origin: Option<String>,
    pub payload_sha256: Option<String>,
    pub db_size_bytes: u64,
}

/// Parse an RFC 3339 timestamp stored in `cache_meta`
pub(super) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
