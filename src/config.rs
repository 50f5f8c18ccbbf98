use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::cache::QueryOptions;

/// Environment variable that overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "MEALDECK_API_BASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub api: ApiConfig,

    pub cache: CacheConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Tokio worker threads; `None` lets the runtime decide.
    pub worker_threads: Option<usize>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
            worker_threads: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend origin; request paths already start with `/api`.
    pub base_url: String,

    pub request_timeout_seconds: u64,

    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_seconds: 30,
            user_agent: format!("mealdeck/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub default_stale_seconds: u64,

    pub weather_stale_seconds: u64,

    pub meal_name_stale_seconds: u64,

    /// Extra attempts for failed reads. Writes are never retried.
    pub query_retries: u32,

    pub retry_delay_ms: u64,

    /// Capacity of the cache event channel.
    pub event_buffer: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_stale_seconds: 5 * 60,
            weather_stale_seconds: 60 * 60,
            meal_name_stale_seconds: 5 * 60,
            query_retries: 1,
            retry_delay_ms: 500,
            event_buffer: 256,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Record cache counters and print them to stderr once a command ends.
    pub metrics_enabled: bool,
}

impl CacheConfig {
    fn options(&self, stale_seconds: u64) -> QueryOptions {
        QueryOptions {
            stale_time: Duration::from_secs(stale_seconds),
            retry: self.query_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    #[must_use]
    pub fn default_options(&self) -> QueryOptions {
        self.options(self.default_stale_seconds)
    }

    #[must_use]
    pub fn weather_options(&self) -> QueryOptions {
        self.options(self.weather_stale_seconds)
    }

    #[must_use]
    pub fn meal_name_options(&self) -> QueryOptions {
        self.options(self.meal_name_stale_seconds)
    }
}

impl Config {
    /// Loads `.env`, the first config file found, then environment
    /// overrides.
    pub fn load() -> Result<Self> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Using API base URL from {BASE_URL_ENV}");
            self.api.base_url = base_url.trim().to_string();
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("mealdeck").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".mealdeck").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes the default config to `config.toml` unless it exists.
    /// Returns the path and whether a file was created.
    pub fn create_default_if_missing() -> Result<(PathBuf, bool)> {
        let path = Self::default_config_path();
        if path.exists() {
            return Ok((path, false));
        }

        Self::default().save_to_path(&path)?;
        info!("Created default config file: {}", path.display());
        Ok((path, true))
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("API base URL cannot be empty");
        }

        let url = url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must use http or https, got {}", url.scheme());
        }

        if self.api.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be > 0");
        }

        if self.cache.event_buffer == 0 {
            anyhow::bail!("Cache event buffer must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.cache.default_stale_seconds, 300);
        assert_eq!(config.cache.weather_stale_seconds, 3600);
        assert_eq!(config.cache.query_retries, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[cache]"));
        assert!(toml_str.contains("[observability]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [cache]
            weather_stale_seconds = 600

            [observability]
            metrics_enabled = true
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.cache.weather_stale_seconds, 600);
        assert_eq!(config.cache.default_stale_seconds, 300);
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert!(config.observability.metrics_enabled);
        assert!(!Config::default().observability.metrics_enabled);
    }

    #[test]
    fn test_env_override_replaces_base_url() {
        let mut config = Config::default();
        config.apply_overrides(|name| {
            (name == BASE_URL_ENV).then(|| " https://meals.example.com ".to_string())
        });
        assert_eq!(config.api.base_url, "https://meals.example.com");

        config.apply_overrides(|_| Some(String::new()));
        assert_eq!(config.api.base_url, "https://meals.example.com");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        config.api.base_url = String::new();
        assert!(config.validate().is_err());

        config.api.base_url = "localhost:3000/api".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cache_options() {
        let cache = CacheConfig::default();
        assert_eq!(cache.weather_options().stale_time, Duration::from_secs(3600));
        assert_eq!(cache.meal_name_options().retry, 1);
        assert_eq!(cache.default_options().retry_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("mealdeck-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");
        let mut config = Config::default();
        config.general.log_level = "debug".to_string();

        config.save_to_path(&path).unwrap();
        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.general.log_level, "debug");

        std::fs::remove_dir_all(dir).unwrap();
    }
}
