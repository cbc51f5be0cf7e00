//! SQLite-backed persistence for stations and explored regions.
//!
//! This module provides the durable half of the cache engine using SQLite
//! with async access via tokio-rusqlite:
//!
//! - Per-id entity rows keyed by `(kind, id)` with a coordinate index for
//!   area queries
//! - Explored-region bookkeeping for bounding-box fetches
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod migrations;
pub mod records;
pub mod regions;

pub use crate::Error;

pub use connection::CacheDb;
pub use records::{CacheStore, CachedEntity};
pub use regions::RegionCoverage;
