//! Console configuration loaded via OrthoConfig.
//!
//! Every value is optional; accessors fall back to the defaults of the hosted
//! API and the browser console.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{DEFAULT_DEBOUNCE, Role};

/// Base URL of the hosted article API.
pub const DEFAULT_BASE_URL: &str = "https://test-fe.mysellerpintar.com/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_ADMIN_PAGE_SIZE: u32 = 10;
const DEFAULT_USER_PAGE_SIZE: u32 = 9;
const DEFAULT_CATEGORY_PAGE_SIZE: u32 = 100;
const SESSION_DIR_NAME: &str = ".article-console";

/// Settings for the remote API, list views and session persistence.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ARTICLE_CONSOLE")]
pub struct ConsoleSettings {
    /// API base URL.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Quiet period before search input is committed, in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Articles per page for accounts that can edit articles.
    pub admin_page_size: Option<u32>,
    /// Articles per page for read-only accounts.
    pub user_page_size: Option<u32>,
    /// Categories fetched per page.
    pub category_page_size: Option<u32>,
    /// Directory holding the persisted session.
    pub session_dir: Option<PathBuf>,
}

impl ConsoleSettings {
    /// Parse the configured base URL, falling back to the hosted API.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when the configured value is not a URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map_or(DEFAULT_TIMEOUT, Duration::from_millis)
    }

    /// Search debounce window.
    pub fn debounce(&self) -> Duration {
        self.debounce_ms
            .map_or(DEFAULT_DEBOUNCE, Duration::from_millis)
    }

    /// Article page size for `role`.
    pub fn article_page_size(&self, role: Role) -> u32 {
        match role {
            Role::Admin => self.admin_page_size.unwrap_or(DEFAULT_ADMIN_PAGE_SIZE),
            Role::User => self.user_page_size.unwrap_or(DEFAULT_USER_PAGE_SIZE),
        }
    }

    /// Category page size.
    pub fn category_page_size(&self) -> u32 {
        self.category_page_size
            .unwrap_or(DEFAULT_CATEGORY_PAGE_SIZE)
    }

    /// Session directory, defaulting to `~/.article-console`.
    pub fn session_dir(&self) -> PathBuf {
        self.session_dir.clone().unwrap_or_else(default_session_dir)
    }
}

fn default_session_dir() -> PathBuf {
    env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(SESSION_DIR_NAME)
}
