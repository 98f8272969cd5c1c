//! Shared helper functions for CLI commands
//!
//! Presentation-side formatting: the core never resolves image URLs or
//! renders prices for display.

use std::sync::Arc;

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::{Config, HttpMenuSource, MenuSource, MenuStore, SyncManager};

/// Resolve a dish photo file name against the image URL template
pub fn image_url(template: &str, image: &str) -> String {
    if template.contains("{image}") {
        template.replace("{image}", image)
    } else {
        format!("{}{}", template, image)
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Load configuration and apply the `--db` override
pub fn load_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load();
    if let Some(ref db) = global.db {
        config.db_path = Some(db.clone());
    }
    config
}

/// Open the configured store
pub fn open_store(config: &Config) -> Result<Arc<MenuStore>> {
    let path = config.db_path()?;
    Ok(Arc::new(MenuStore::open(&path)?))
}

/// Sync manager over the configured store and HTTP source, or a custom one
pub fn sync_manager(config: &Config, source: Option<Box<dyn MenuSource>>) -> Result<SyncManager> {
    let store = open_store(config)?;
    let source: Box<dyn MenuSource> = match source {
        Some(source) => source,
        None => Box::new(HttpMenuSource::new(config.menu_url())?),
    };
    Ok(SyncManager::new(store, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_template() {
        assert_eq!(
            image_url("https://cdn.example.com/{image}?raw=true", "pasta.jpg"),
            "https://cdn.example.com/pasta.jpg?raw=true"
        );
        assert_eq!(
            image_url("https://cdn.example.com/img/", "pasta.jpg"),
            "https://cdn.example.com/img/pasta.jpg"
        );
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("crème brûlée tart", 8), "crème...");
    }
}
