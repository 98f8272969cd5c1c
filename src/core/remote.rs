//! Remote menu source
//!
//! The canonical menu is a flat JSON document (`{"menu": [...]}`) served
//! from a fixed URL without authentication or pagination. A file-backed
//! source reads the same document from disk for offline imports.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use crate::core::error::MenuError;
use crate::core::menu::MenuPayload;

/// Menu document published alongside the original app
pub const DEFAULT_MENU_URL: &str =
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/capstone.json";

/// Anything that can produce the canonical menu
pub trait MenuSource: Send + Sync {
    /// Where the menu comes from (URL or path), for logs and bookkeeping
    fn origin(&self) -> &str;

    /// Fetch and decode the whole menu
    fn fetch_menu(&self) -> Result<MenuPayload, MenuError>;
}

/// Fetches the menu over HTTPS
pub struct HttpMenuSource {
    client: Client,
    url: String,
}

impl HttpMenuSource {
    pub fn new(url: impl Into<String>) -> Result<Self, MenuError> {
        let url = url.into();
        let client = Client::builder()
            .user_agent(concat!("little-lemon/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MenuError::fetch(&url, e))?;
        Ok(Self { client, url })
    }
}

impl MenuSource for HttpMenuSource {
    fn origin(&self) -> &str {
        &self.url
    }

    fn fetch_menu(&self) -> Result<MenuPayload, MenuError> {
        tracing::info!(url = %self.url, "fetching remote menu");

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| MenuError::fetch(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MenuError::fetch(&self.url, format!("HTTP {}", status)));
        }

        let body = response.bytes().map_err(|e| MenuError::fetch(&self.url, e))?;
        MenuPayload::from_json(&body).map_err(|e| MenuError::fetch(&self.url, format!("invalid menu JSON: {}", e)))
    }
}

/// Reads a menu document from a local file
pub struct FileMenuSource {
    path: PathBuf,
    origin: String,
}

impl FileMenuSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            origin: path.display().to_string(),
        }
    }
}

impl MenuSource for FileMenuSource {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn fetch_menu(&self) -> Result<MenuPayload, MenuError> {
        tracing::info!(path = %self.path.display(), "reading menu file");

        let content = fs::read(&self.path).map_err(|e| MenuError::fetch(&self.origin, e))?;
        MenuPayload::from_json(&content)
            .map_err(|e| MenuError::fetch(&self.origin, format!("invalid menu JSON: {}", e)))
    }
}
