//! Core cache engine for a transit-information client.
//!
//! This crate provides:
//! - Per-id persisted entity cache with TTL, backed by SQLite
//! - Explored-region tracking for bounding-box queries
//! - A minimum-interval throttle around bulk fetches
//! - A provider facade composing the three behind `get_station` /
//!   `get_stations`
//! - Configuration structures and unified error types

pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod provider;
pub mod store;
pub mod throttle;

pub use config::AppConfig;
pub use error::Error;
pub use geo::{BoundingBox, Coordinates};
pub use model::{EntityKind, StationRecord};
pub use provider::{ProviderConfig, StationClient, StationProvider};
pub use store::{CacheDb, CacheStore, CachedEntity, RegionCoverage};
pub use throttle::CallThrottle;
