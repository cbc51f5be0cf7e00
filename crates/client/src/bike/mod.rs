//! Bike-share feed client.
//!
//! The upstream feed has neither a spatial filter nor a by-id endpoint:
//! the only operation is "download every station". `fetch_by_area`
//! therefore ignores the requested box and reports whole-world coverage,
//! so one successful fetch marks every future query box explored, and
//! `fetch_one` filters the full feed locally. The cache engine's throttle
//! is what keeps this from hammering the upstream.

pub mod response;

use async_trait::async_trait;
use ridecache_core::geo::BoundingBox;
use ridecache_core::model::{BikeStation, StationRecord};
use ridecache_core::provider::StationClient;
use ridecache_core::{AppConfig, Error};
use std::time::Duration;

use crate::error::{ClientError, check_status};
use response::BikeFeed;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "ridecache/0.1";

/// Bike feed client configuration.
#[derive(Debug, Clone)]
pub struct BikeConfig {
    /// Base URL of the feed.
    pub base_url: String,
    /// API key, if the deployment requires one.
    pub api_key: Option<String>,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for BikeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://data.keolis-rennes.com/json".to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl BikeConfig {
    /// Derive client settings from the application configuration.
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            base_url: config.bike_base_url.clone(),
            api_key: None,
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Bike-share feed client.
#[derive(Debug, Clone)]
pub struct BikeClient {
    http: reqwest::Client,
    config: BikeConfig,
}

impl BikeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: BikeConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(ClientError::from)?;

        Ok(Self { http, config })
    }

    /// Download the full station feed.
    async fn fetch_feed(&self) -> Result<BikeFeed, ClientError> {
        let url = format!("{}/stations", self.config.base_url);

        tracing::debug!(url = %url, "fetching bike station feed");

        let mut request = self.http.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await.map_err(ClientError::from)?;
        check_status(response.status())?;

        let feed: BikeFeed = response.json().await.map_err(|e| ClientError::Parse(e.to_string()))?;
        tracing::debug!(count = feed.stations.len(), "bike feed fetched");
        Ok(feed)
    }
}

#[async_trait]
impl StationClient for BikeClient {
    type Entity = BikeStation;

    /// The feed has no by-id endpoint; download and filter.
    async fn fetch_one(&self, id: &str) -> Result<BikeStation, Error> {
        let feed = self.fetch_feed().await.map_err(Error::from)?;
        feed.stations
            .into_iter()
            .find(|s| s.number == id)
            .map(BikeStation::from)
            .ok_or_else(|| Error::NotFound { kind: BikeStation::KIND, id: id.to_string() })
    }

    /// The feed has no spatial filter; the box is ignored.
    async fn fetch_by_area(&self, _bounds: BoundingBox) -> Result<Vec<BikeStation>, Error> {
        let feed = self.fetch_feed().await.map_err(Error::from)?;
        Ok(feed.stations.into_iter().map(BikeStation::from).collect())
    }

    fn coverage(&self, _requested: BoundingBox) -> BoundingBox {
        BoundingBox::WORLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BikeConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.user_agent, "ridecache/0.1");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_from_app() {
        let app = AppConfig { bike_base_url: "https://feed.example/json".into(), ..Default::default() };
        let config = BikeConfig::from_app(&app);
        assert_eq!(config.base_url, "https://feed.example/json");
        assert_eq!(config.timeout, app.timeout());
    }

    #[test]
    fn test_coverage_is_whole_world() {
        let client = BikeClient::new(BikeConfig::default()).unwrap();
        let requested = BoundingBox::new(0, 10, 0, 10);
        assert_eq!(client.coverage(requested), BoundingBox::WORLD);
    }
}
