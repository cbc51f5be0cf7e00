//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use thiserror::Error;

use crate::config::AppConfig;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - either TTL or the refresh interval is 0
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or a base URL is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.record_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "record_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.region_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "region_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "refresh_interval_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }
        if self.bike_base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "bike_base_url".into(), reason: "must not be empty".into() });
        }
        if self.stops_base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "stops_base_url".into(), reason: "must not be empty".into() });
        }

        if self.refresh_interval_secs > self.region_ttl_secs {
            tracing::warn!(
                refresh_interval_secs = self.refresh_interval_secs,
                region_ttl_secs = self.region_ttl_secs,
                "refresh interval exceeds the region TTL; regions will expire \
                 before the throttle window reopens"
            );
        }

        Ok(())
    }
}
