//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::debounce::DEFAULT_QUIET_PERIOD;
use crate::core::error::MenuError;
use crate::core::remote::DEFAULT_MENU_URL;

/// Where dish photos live; `{image}` is replaced by the item's file name
pub const DEFAULT_IMAGE_URL_TEMPLATE: &str =
    "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images/{image}?raw=true";

const DB_FILE: &str = "little-lemon.db";

/// Lemon configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// URL of the remote menu document
    pub menu_url: Option<String>,

    /// Location of the local menu database
    pub db_path: Option<PathBuf>,

    /// Template for dish photo URLs
    pub image_url_template: Option<String>,

    /// Search debounce in milliseconds
    pub debounce_ms: Option<u64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (resolved lazily by the accessors)

        // 2. Global user config (~/.config/little-lemon/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            match Self::from_file(&global_path) {
                Ok(Some(global)) => config.merge(global),
                Ok(None) => {}
                Err(e) => tracing::warn!(path = %global_path.display(), error = %e, "ignoring config file"),
            }
        }

        // 3. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    /// Read a config file; `Ok(None)` when it does not exist
    pub fn from_file(path: &Path) -> Result<Option<Self>, MenuError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yml::from_str::<Config>(&contents)
            .map(Some)
            .map_err(|e| MenuError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply `LEMON_*` overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LEMON_MENU_URL") {
            self.menu_url = Some(url);
        }
        if let Some(path) = lookup("LEMON_DB") {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(template) = lookup("LEMON_IMAGE_URL") {
            self.image_url_template = Some(template);
        }
        if let Some(ms) = lookup("LEMON_DEBOUNCE_MS") {
            match ms.trim().parse() {
                Ok(ms) => self.debounce_ms = Some(ms),
                Err(_) => tracing::warn!(value = %ms, "LEMON_DEBOUNCE_MS is not a number, ignoring"),
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "little-lemon")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.menu_url.is_some() {
            self.menu_url = other.menu_url;
        }
        if other.db_path.is_some() {
            self.db_path = other.db_path;
        }
        if other.image_url_template.is_some() {
            self.image_url_template = other.image_url_template;
        }
        if other.debounce_ms.is_some() {
            self.debounce_ms = other.debounce_ms;
        }
    }

    pub fn menu_url(&self) -> &str {
        self.menu_url.as_deref().unwrap_or(DEFAULT_MENU_URL)
    }

    /// Database path, falling back to the platform data directory
    pub fn db_path(&self) -> Result<PathBuf, MenuError> {
        if let Some(ref path) = self.db_path {
            return Ok(path.clone());
        }
        directories::ProjectDirs::from("", "", "little-lemon")
            .map(|dirs| dirs.data_dir().join(DB_FILE))
            .ok_or_else(|| {
                MenuError::Config("no home directory found; set LEMON_DB or pass --db".to_string())
            })
    }

    pub fn image_url_template(&self) -> &str {
        self.image_url_template
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_URL_TEMPLATE)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.menu_url(), DEFAULT_MENU_URL);
        assert_eq!(config.image_url_template(), DEFAULT_IMAGE_URL_TEMPLATE);
        assert_eq!(config.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_file_then_env_precedence() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(
            &path,
            "menu_url: https://example.com/file.json\ndebounce_ms: 250\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.merge(Config::from_file(&path).unwrap().unwrap());
        assert_eq!(config.menu_url(), "https://example.com/file.json");
        assert_eq!(config.debounce(), Duration::from_millis(250));

        let env: HashMap<&str, &str> = [
            ("LEMON_MENU_URL", "https://example.com/env.json"),
            ("LEMON_DB", "/tmp/lemon.db"),
            ("LEMON_DEBOUNCE_MS", "oops"),
        ]
        .into_iter()
        .collect();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.menu_url(), "https://example.com/env.json");
        assert_eq!(config.db_path().unwrap(), PathBuf::from("/tmp/lemon.db"));
        // Invalid number leaves the file value in place
        assert_eq!(config.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_file_is_none() {
        let tmp = tempdir().unwrap();
        assert!(Config::from_file(&tmp.path().join("absent.yaml")).unwrap().is_none());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "debounce_ms: [not, a, number]\n").unwrap();
        assert!(matches!(Config::from_file(&path), Err(MenuError::Config(_))));
    }
}
