//! Remote transit API clients for ridecache.
//!
//! This crate provides thin HTTP clients for the upstream transit data
//! providers, each implementing the `StationClient` boundary trait from
//! `ridecache-core` so the cache engine can compose them behind a
//! provider facade.

pub mod bike;
pub mod error;
pub mod stops;

pub use bike::{BikeClient, BikeConfig};
pub use error::ClientError;
pub use stops::{StopsClient, StopsConfig};
