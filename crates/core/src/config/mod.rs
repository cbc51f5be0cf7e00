//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (RIDECACHE_*)
//! 2. TOML config file (if RIDECACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (RIDECACHE_*)
/// 2. TOML config file (if RIDECACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via RIDECACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// How long a cached entity row stays trustworthy, in seconds.
    ///
    /// Set via RIDECACHE_RECORD_TTL_SECS environment variable.
    #[serde(default = "default_ttl_secs")]
    pub record_ttl_secs: u64,

    /// How long an explored region stays trustworthy, in seconds.
    ///
    /// Set via RIDECACHE_REGION_TTL_SECS environment variable.
    #[serde(default = "default_ttl_secs")]
    pub region_ttl_secs: u64,

    /// Minimum interval between bulk fetches of a full upstream dataset,
    /// in seconds.
    ///
    /// Set via RIDECACHE_REFRESH_INTERVAL_SECS environment variable.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via RIDECACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via RIDECACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the bike-share feed.
    ///
    /// Set via RIDECACHE_BIKE_BASE_URL environment variable.
    #[serde(default = "default_bike_base_url")]
    pub bike_base_url: String,

    /// Base URL of the stops-for-location API.
    ///
    /// Set via RIDECACHE_STOPS_BASE_URL environment variable.
    #[serde(default = "default_stops_base_url")]
    pub stops_base_url: String,

    /// API key for the stops-for-location API.
    ///
    /// Set via RIDECACHE_STOPS_API_KEY environment variable.
    /// Required only when the stops client is constructed.
    #[serde(default)]
    pub stops_api_key: Option<String>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./ridecache.sqlite")
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    "ridecache/0.1".into()
}

fn default_bike_base_url() -> String {
    "https://data.keolis-rennes.com/json".into()
}

fn default_stops_base_url() -> String {
    "https://api.onebusaway.org/api/where".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            record_ttl_secs: default_ttl_secs(),
            region_ttl_secs: default_ttl_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            bike_base_url: default_bike_base_url(),
            stops_base_url: default_stops_base_url(),
            stops_api_key: None,
        }
    }
}

impl AppConfig {
    /// Record TTL as Duration.
    pub fn record_ttl(&self) -> Duration {
        Duration::from_secs(self.record_ttl_secs)
    }

    /// Region TTL as Duration.
    pub fn region_ttl(&self) -> Duration {
        Duration::from_secs(self.region_ttl_secs)
    }

    /// Bulk refresh interval as Duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `RIDECACHE_`
    /// 2. TOML file from `RIDECACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("RIDECACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("RIDECACHE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the stops API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the stops API key is not set.
    pub fn require_stops_api_key(&self) -> Result<&str, ConfigError> {
        self.stops_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "stops_api_key".into(),
            hint: "Set RIDECACHE_STOPS_API_KEY environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./ridecache.sqlite"));
        assert_eq!(config.record_ttl_secs, 3600);
        assert_eq!(config.region_ttl_secs, 3600);
        assert_eq!(config.refresh_interval_secs, 300);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.user_agent, "ridecache/0.1");
        assert!(config.stops_api_key.is_none());
    }

    #[test]
    fn test_duration_accessors() {
        let config = AppConfig::default();
        assert_eq!(config.record_ttl(), Duration::from_secs(3600));
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_require_stops_api_key_missing() {
        let config = AppConfig::default();
        let result = config.require_stops_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_stops_api_key_present() {
        let config = AppConfig { stops_api_key: Some("test-key".into()), ..Default::default() };
        let result = config.require_stops_api_key();
        assert_eq!(result.unwrap(), "test-key");
    }
}
