//! Dashboard configuration.
//!
//! Loaded from a TOML file whose sections all default, so an empty or missing
//! file yields a working setup against the public upstreams. `DATABASE_URL`
//! overrides `store.database_url`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::errors::{AppError, Result};
use crate::ingest::selectors::SelectorChain;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "NEWSDESK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "newsdesk.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    /// Whether to fetch on startup; never inferred from the store file.
    #[serde(default)]
    pub startup: StartupConfig,

    #[serde(default)]
    pub posts: PostSourceConfig,

    #[serde(default)]
    pub news: NewsSourceConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration or return defaults if the file can't be read.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|err| {
            warn!(path = ?path.as_ref(), error = %err, "Config load failed, using defaults");
            Self::default()
        })
    }

    /// Resolve the config path from `NEWSDESK_CONFIG`, load it, then apply
    /// `DATABASE_URL`.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::load_or_default(path);
        config.apply_env_overrides();
        config
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            self.store.database_url = database_url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.display.page_size == 0 {
            return Err(AppError::config("display.page_size must be > 0"));
        }
        if self.store.database_url.trim().is_empty() {
            return Err(AppError::config("store.database_url is empty"));
        }
        if self.posts.first_user_id > self.posts.last_user_id {
            return Err(AppError::config(
                "posts.first_user_id must not exceed posts.last_user_id",
            ));
        }
        if self.posts.timeout_secs == Some(0) {
            return Err(AppError::config("posts.timeout_secs must be > 0"));
        }
        if self.news.timeout_secs == 0 {
            return Err(AppError::config("news.timeout_secs must be > 0"));
        }
        if self.news.user_agent.trim().is_empty() {
            return Err(AppError::config("news.user_agent is empty"));
        }
        if self.news.categories.is_empty() {
            return Err(AppError::config("No news categories defined"));
        }
        if let Some(blank) = self.news.categories.iter().find(|c| c.name.trim().is_empty()) {
            return Err(AppError::config(format!(
                "news category with path '{}' has an empty name",
                blank.path
            )));
        }

        url::Url::parse(&self.posts.endpoint)?;
        url::Url::parse(&self.news.base_url)?;

        for (name, selectors) in [
            ("news.container_selectors", &self.news.container_selectors),
            ("news.title_selectors", &self.news.title_selectors),
            ("news.body_selectors", &self.news.body_selectors),
        ] {
            if selectors.is_empty() {
                return Err(AppError::config(format!("{name} is empty")));
            }
            SelectorChain::parse(selectors.as_slice())?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::bind_addr")]
    pub bind_addr: String,

    /// Upper bound for a whole request, including any upstream fetch it triggers
    #[serde(default = "defaults::request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::bind_addr(),
            request_timeout_secs: defaults::request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "defaults::database_url")]
    pub database_url: String,

    /// Delete the store file once the server has shut down
    #[serde(default = "defaults::remove_on_exit")]
    pub remove_on_exit: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::database_url(),
            remove_on_exit: defaults::remove_on_exit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartupConfig {
    #[serde(default = "defaults::startup_fetch")]
    pub fetch: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            fetch: defaults::startup_fetch(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostSourceConfig {
    /// Collection endpoint, queried with `?userId=<id>`
    #[serde(default = "defaults::posts_endpoint")]
    pub endpoint: String,

    #[serde(default = "defaults::first_user_id")]
    pub first_user_id: i32,

    #[serde(default = "defaults::last_user_id")]
    pub last_user_id: i32,

    /// No timeout unless set
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for PostSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::posts_endpoint(),
            first_user_id: defaults::first_user_id(),
            last_user_id: defaults::last_user_id(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySource {
    /// Tag stored on every item scraped from this page
    pub name: String,
    /// Landing page, relative to `news.base_url`
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsSourceConfig {
    #[serde(default = "defaults::news_base_url")]
    pub base_url: String,

    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    #[serde(default = "defaults::news_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "defaults::categories")]
    pub categories: Vec<CategorySource>,

    /// Tried in order; the first one matching anything on a page wins
    #[serde(default = "defaults::container_selectors")]
    pub container_selectors: Vec<String>,

    #[serde(default = "defaults::title_selectors")]
    pub title_selectors: Vec<String>,

    #[serde(default = "defaults::body_selectors")]
    pub body_selectors: Vec<String>,
}

impl Default for NewsSourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::news_base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::news_timeout(),
            categories: defaults::categories(),
            container_selectors: defaults::container_selectors(),
            title_selectors: defaults::title_selectors(),
            body_selectors: defaults::body_selectors(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
        }
    }
}

mod defaults {
    use super::CategorySource;

    pub fn bind_addr() -> String {
        "0.0.0.0:3000".to_string()
    }

    pub fn request_timeout() -> u64 {
        120
    }

    pub fn database_url() -> String {
        "newsdesk.db".to_string()
    }

    pub fn remove_on_exit() -> bool {
        true
    }

    pub fn startup_fetch() -> bool {
        true
    }

    pub fn posts_endpoint() -> String {
        "https://jsonplaceholder.typicode.com/posts".to_string()
    }

    pub fn first_user_id() -> i32 {
        1
    }

    pub fn last_user_id() -> i32 {
        10
    }

    pub fn news_base_url() -> String {
        "https://digiato.com".to_string()
    }

    pub fn user_agent() -> String {
        crate::ingest::DEFAULT_USER_AGENT.to_string()
    }

    pub fn news_timeout() -> u64 {
        10
    }

    pub fn categories() -> Vec<CategorySource> {
        [
            ("tech", "/topic/technology"),
            ("mobile", "/topic/mobile"),
            ("science", "/topic/science"),
            ("games", "/topic/game"),
        ]
        .into_iter()
        .map(|(name, path)| CategorySource {
            name: name.to_string(),
            path: path.to_string(),
        })
        .collect()
    }

    pub fn container_selectors() -> Vec<String> {
        vec![
            "div.rowCard.homeTodayItem".to_string(),
            "div.rowCard".to_string(),
            "article".to_string(),
            "div.post-item".to_string(),
        ]
    }

    pub fn title_selectors() -> Vec<String> {
        vec![
            "a.rowCard__title".to_string(),
            "h2 a".to_string(),
            "h3 a".to_string(),
            ".title a".to_string(),
            "h2".to_string(),
        ]
    }

    pub fn body_selectors() -> Vec<String> {
        vec![
            "p.rowCard__description".to_string(),
            ".excerpt".to_string(),
            ".description".to_string(),
            "p".to_string(),
        ]
    }

    pub fn page_size() -> u32 {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.display.page_size, 5);
        assert_eq!(config.posts.first_user_id, 1);
        assert_eq!(config.posts.last_user_id, 10);
        assert!(config.posts.timeout_secs.is_none());
        assert_eq!(config.news.timeout_secs, 10);
        assert!(config.startup.fetch);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [startup]
            fetch = false

            [news]
            base_url = "http://127.0.0.1:9000"
            categories = [{ name = "tech", path = "/tech" }]
            "#,
        )
        .unwrap();

        assert!(!config.startup.fetch);
        assert_eq!(config.news.categories.len(), 1);
        assert_eq!(config.news.container_selectors, defaults::container_selectors());
        assert_eq!(config.news.categories[0].name, "tech");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.display.page_size = 0;
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));

        let mut config = Config::default();
        config.posts.first_user_id = 11;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.news.categories.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.news.title_selectors = vec!["a[".to_string()];
        assert!(matches!(
            config.validate(),
            Err(AppError::SelectorError { .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml"));
        assert_eq!(config.store.database_url, "newsdesk.db");
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newsdesk.toml");
        fs::write(&path, "[display]\npage_size = 7\n").unwrap();

        assert_eq!(Config::load(&path).unwrap().display.page_size, 7);
    }
}
