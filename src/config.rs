use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants;
use crate::error::{MentionError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub rate_limit_calls: u32,
    pub rate_limit_period_seconds: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: constants::DEFAULT_TIMEOUT_SECS,
            max_retries: constants::DEFAULT_MAX_RETRIES,
            rate_limit_calls: constants::DEFAULT_RATE_LIMIT_CALLS,
            rate_limit_period_seconds: constants::DEFAULT_RATE_LIMIT_PERIOD_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub db_path: String,
    pub table_name: String,
    pub ttl_days: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: constants::DEFAULT_DB_PATH.to_string(),
            table_name: constants::DEFAULT_TABLE_NAME.to_string(),
            ttl_days: constants::MENTION_TTL_DAYS,
        }
    }
}

impl Config {
    /// Load `path` if it exists, then apply environment overrides (`.env` included).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let _ = dotenv::dotenv();
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                MentionError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("MENTIONMIND_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.api.api_key = Some(key);
        }
        if let Some(url) = lookup("MENTIONMIND_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(table) = lookup("MENTIONS_TABLE").filter(|v| !v.trim().is_empty()) {
            self.store.table_name = table;
        }
        if let Some(db_path) = lookup("MENTIONS_DB_PATH").filter(|v| !v.trim().is_empty()) {
            self.store.db_path = db_path;
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api
            .api_key
            .as_deref()
            .ok_or_else(|| MentionError::Config("MENTIONMIND_API_KEY not found in environment variables".into()))
    }
}
