//! Station provider facade: cache-or-fetch decisions per transport kind.
//!
//! A provider composes the per-id store, the shared region tracker, a
//! remote client, and optionally the bulk-fetch throttle. It answers the
//! two questions the UI layer asks — one station by id, all stations in a
//! bounding box — from local storage whenever the cached data is fresh
//! enough, and falls through to the remote client otherwise.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::Error;
use crate::config::AppConfig;
use crate::geo::BoundingBox;
use crate::model::StationRecord;
use crate::store::{CacheDb, CacheStore, RegionCoverage};
use crate::throttle::CallThrottle;

/// Boundary contract for a remote transit API client.
///
/// Entities must expose id and, for spatially queryable kinds,
/// coordinates in the same fixed-point representation as the bounds.
#[async_trait]
pub trait StationClient: Send + Sync {
    type Entity: StationRecord;

    /// Fetch a single entity by id.
    async fn fetch_one(&self, id: &str) -> Result<Self::Entity, Error>;

    /// Fetch all entities inside `bounds`.
    ///
    /// Clients whose upstream API has no spatial filter ignore the box and
    /// fetch everything; they also override [`Self::coverage`].
    async fn fetch_by_area(&self, bounds: BoundingBox) -> Result<Vec<Self::Entity>, Error>;

    /// The bounds actually covered by a successful `fetch_by_area`.
    ///
    /// Defaults to the requested box. Clients without a spatial filter
    /// return [`BoundingBox::WORLD`] so one full fetch marks every future
    /// query box as explored.
    fn coverage(&self, requested: BoundingBox) -> BoundingBox {
        requested
    }
}

/// Freshness and throttling knobs for one provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// How long a cached entity row stays trustworthy.
    pub record_ttl: Duration,

    /// How long an explored region stays trustworthy.
    pub region_ttl: Duration,

    /// Minimum interval between bulk fetches; None disables the gate.
    ///
    /// Only useful for clients without a spatial filter, where every miss
    /// would otherwise re-fetch the entire upstream dataset.
    pub refresh_interval: Option<Duration>,
}

impl ProviderConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            record_ttl: config.record_ttl(),
            region_ttl: config.region_ttl(),
            refresh_interval: Some(config.refresh_interval()),
        }
    }
}

/// Facade answering `get_station` / `get_stations` for one transport kind.
///
/// The region tracker is injected, never constructed here: all providers
/// on one database share a single instance.
pub struct StationProvider<C: StationClient> {
    store: CacheStore<C::Entity>,
    regions: RegionCoverage,
    client: C,
    record_ttl: Duration,
    region_ttl: Duration,
    throttle: Option<CallThrottle>,
    // Serializes the is_explored -> fetch -> mark_explored sequence so
    // concurrent overlapping queries trigger at most one bulk fetch.
    area_lock: Mutex<()>,
}

impl<C: StationClient> StationProvider<C> {
    pub fn new(db: CacheDb, regions: RegionCoverage, client: C, config: ProviderConfig) -> Self {
        Self {
            store: CacheStore::new(db),
            regions,
            client,
            record_ttl: config.record_ttl,
            region_ttl: config.region_ttl,
            throttle: config.refresh_interval.map(CallThrottle::new),
            area_lock: Mutex::new(()),
        }
    }

    /// Look up one station, trusting a fresh cache hit.
    ///
    /// The record TTL applies here just as on the area path: a stale hit
    /// triggers a refetch. On refetch failure the error propagates; the
    /// stale row stays in place for a later successful refresh to replace.
    pub async fn get_station(&self, id: &str) -> Result<C::Entity, Error> {
        if let Some(hit) = self.store.load(id).await? {
            if self.is_fresh(hit.updated_at) {
                return Ok(hit.entity);
            }
            tracing::debug!(kind = %C::Entity::KIND, id, "cache hit is stale, refetching");
        }

        let entity = self.client.fetch_one(id).await?;
        self.store.replace(&entity).await?;
        Ok(entity)
    }

    /// Look up all stations inside `area`.
    ///
    /// Served from the store when a fresh explored region contains the
    /// (normalized) box; otherwise fetched remotely, persisted, and the
    /// fetched coverage marked explored. A remote failure leaves the
    /// store untouched and the region unmarked, so the next request
    /// retries the fetch.
    pub async fn get_stations(&self, area: BoundingBox) -> Result<Vec<C::Entity>, Error> {
        let area = area.normalized();
        let _guard = self.area_lock.lock().await;

        if self.regions.is_explored(C::Entity::KIND, area, self.region_ttl).await? {
            tracing::debug!(kind = %C::Entity::KIND, "area already explored, serving from store");
            return self.store.load_by_area(area).await;
        }

        let fetched = match &self.throttle {
            Some(throttle) => match throttle.guarded_call(|| self.client.fetch_by_area(area)).await? {
                Some(fetched) => fetched,
                // Bulk fetch gated: serve what we have, leave the region
                // unexplored so the fetch happens once the window reopens.
                None => return self.store.load_by_area(area).await,
            },
            None => self.client.fetch_by_area(area).await?,
        };

        tracing::debug!(kind = %C::Entity::KIND, count = fetched.len(), "bulk fetch succeeded");
        self.store.replace_all(&fetched).await?;
        self.regions.mark_explored(C::Entity::KIND, self.client.coverage(area)).await?;

        // Return the fresh batch directly rather than re-reading the store;
        // clients without a spatial filter may have returned more than the
        // requested box, so trim to it.
        Ok(fetched
            .into_iter()
            .filter(|e| e.coords().is_some_and(|c| area.contains_point(c)))
            .collect())
    }

    /// Release the underlying storage resources. Safe to call repeatedly.
    pub async fn release(&self) -> Result<(), Error> {
        self.store.db().close().await
    }

    fn is_fresh(&self, updated_at: chrono::DateTime<Utc>) -> bool {
        Utc::now() - updated_at <= chrono::Duration::seconds(self.record_ttl.as_secs() as i64)
    }
}
