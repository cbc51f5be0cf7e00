//! Stops-for-location API client.
//!
//! Unlike the bike feed, this upstream filters by bounding box on the
//! server side and has a real by-id endpoint, so `coverage` stays at its
//! default (the requested box) and no throttle is needed in front of it.

pub mod response;

use async_trait::async_trait;
use ridecache_core::geo::BoundingBox;
use ridecache_core::model::{BusStation, StationRecord};
use ridecache_core::provider::StationClient;
use ridecache_core::{AppConfig, Error};
use ridecache_core::config::ConfigError;
use std::time::Duration;

use crate::error::{ClientError, check_status};
use response::{Envelope, StopDto, StopList};

/// Stops API client configuration.
#[derive(Debug, Clone)]
pub struct StopsConfig {
    /// Base URL of the API.
    pub base_url: String,
    /// API key; required by the upstream.
    pub api_key: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl StopsConfig {
    /// Derive client settings from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when no API key is configured.
    pub fn from_app(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.stops_base_url.clone(),
            api_key: config.require_stops_api_key()?.to_string(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Stops-for-location API client.
#[derive(Debug, Clone)]
pub struct StopsClient {
    http: reqwest::Client,
    config: StopsConfig,
}

impl StopsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: StopsConfig) -> Result<Self, ClientError> {
        if config.api_key.is_empty() {
            return Err(ClientError::MissingApiKey("stops_api_key".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(ClientError::from)?;

        Ok(Self { http, config })
    }

    /// Query parameters for a bounding box, in degrees.
    fn area_params(bounds: BoundingBox) -> [(&'static str, String); 4] {
        [
            ("west", degrees(bounds.west)),
            ("east", degrees(bounds.east)),
            ("south", degrees(bounds.south)),
            ("north", degrees(bounds.north)),
        ]
    }
}

/// Fixed-point micro-degrees back to degrees for the query string.
fn degrees(micro: i32) -> String {
    format!("{:.6}", micro as f64 / 1_000_000.0)
}

#[async_trait]
impl StationClient for StopsClient {
    type Entity = BusStation;

    async fn fetch_one(&self, id: &str) -> Result<BusStation, Error> {
        let url = format!("{}/stop/{}.json", self.config.base_url, id);

        tracing::debug!(url = %url, "fetching stop by id");

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::from(ClientError::from(e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound { kind: BusStation::KIND, id: id.to_string() });
        }
        check_status(response.status()).map_err(Error::from)?;

        let envelope: Envelope<StopDto> = response
            .json()
            .await
            .map_err(|e| Error::from(ClientError::Parse(e.to_string())))?;
        let dto = envelope.into_data().map_err(Error::from)?;
        Ok(BusStation::from(dto))
    }

    async fn fetch_by_area(&self, bounds: BoundingBox) -> Result<Vec<BusStation>, Error> {
        let url = format!("{}/stops-for-area.json", self.config.base_url);

        tracing::debug!(url = %url, ?bounds, "fetching stops for area");

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .query(&Self::area_params(bounds))
            .send()
            .await
            .map_err(|e| Error::from(ClientError::from(e)))?;

        check_status(response.status()).map_err(Error::from)?;

        let envelope: Envelope<StopList> = response
            .json()
            .await
            .map_err(|e| Error::from(ClientError::Parse(e.to_string())))?;
        let list = envelope.into_data().map_err(Error::from)?;

        tracing::debug!(count = list.stops.len(), "stops fetched");
        Ok(list.stops.into_iter().map(BusStation::from).collect())
    }
}
