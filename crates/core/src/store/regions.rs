//! Explored-region bookkeeping for bounding-box fetches.
//!
//! Records which areas have already been fetched from a remote API, so an
//! equal-or-smaller query inside a fresh region can be answered from the
//! local store without a network call. The test is full rectangle
//! containment, not overlap: skipping on overlap would serve incomplete
//! results for the unexplored remainder of the query box.
//!
//! Overlapping regions of the same kind may coexist and are never merged;
//! growth is bounded by purging expired rows instead.

use std::time::Duration;

use chrono::Utc;
use tokio_rusqlite::params;

use super::connection::CacheDb;
use crate::Error;
use crate::geo::BoundingBox;
use crate::model::EntityKind;

/// Tracker for previously fetched bounding boxes, one row per fetch.
///
/// One instance is shared per database by every provider on that
/// connection; construct it once and pass it into each facade.
#[derive(Clone, Debug)]
pub struct RegionCoverage {
    db: CacheDb,
}

impl RegionCoverage {
    pub fn new(db: CacheDb) -> Self {
        Self { db }
    }

    /// Whether a stored region of `kind` fully contains `bounds` and was
    /// marked within the last `ttl`.
    ///
    /// Returns false when no stored region satisfies containment; the
    /// caller must then perform the real fetch.
    pub async fn is_explored(&self, kind: EntityKind, bounds: BoundingBox, ttl: Duration) -> Result<bool, Error> {
        let b = bounds.normalized();
        let stale_before = (Utc::now() - chrono::Duration::seconds(ttl.as_secs() as i64)).to_rfc3339();
        self.db
            .conn
            .call(move |conn| -> Result<bool, Error> {
                let explored: bool = conn
                    .query_row(
                        "SELECT EXISTS(
                            SELECT 1 FROM explored_regions
                            WHERE kind = ?1
                              AND west <= ?2 AND east >= ?3
                              AND south <= ?4 AND north >= ?5
                              AND updated_at > ?6
                        )",
                        params![kind.as_str(), b.west, b.east, b.south, b.north, stale_before],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;

                Ok(explored)
            })
            .await
            .map_err(Error::from)
    }

    /// Record `bounds` as fetched now.
    ///
    /// The box is normalized before storage so a raw box can never be
    /// persisted. Overlapping prior regions are left untouched.
    pub async fn mark_explored(&self, kind: EntityKind, bounds: BoundingBox) -> Result<(), Error> {
        let b = bounds.normalized();
        let updated_at = Utc::now().to_rfc3339();
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO explored_regions (kind, west, east, south, north, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![kind.as_str(), b.west, b.east, b.south, b.north, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete regions of `kind` older than `ttl`.
    ///
    /// Expired regions can never satisfy [`Self::is_explored`], so removing
    /// them only bounds table growth. Returns the number of deleted rows.
    pub async fn purge_expired(&self, kind: EntityKind, ttl: Duration) -> Result<u64, Error> {
        let stale_before = (Utc::now() - chrono::Duration::seconds(ttl.as_secs() as i64)).to_rfc3339();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM explored_regions WHERE kind = ?1 AND updated_at <= ?2",
                    params![kind.as_str(), stale_before],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    async fn tracker() -> RegionCoverage {
        RegionCoverage::new(CacheDb::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_containment_correctness() {
        let regions = tracker().await;
        let marked = BoundingBox::new(0, 10_000_000, 0, 10_000_000);
        regions.mark_explored(EntityKind::BusStation, marked).await.unwrap();

        let inner = BoundingBox::new(2_000_000, 5_000_000, 2_000_000, 5_000_000);
        let overlapping = BoundingBox::new(5_000_000, 15_000_000, 5_000_000, 15_000_000);

        assert!(regions.is_explored(EntityKind::BusStation, marked, TTL).await.unwrap());
        assert!(regions.is_explored(EntityKind::BusStation, inner, TTL).await.unwrap());
        assert!(!regions.is_explored(EntityKind::BusStation, overlapping, TTL).await.unwrap());
    }

    #[tokio::test]
    async fn test_kinds_do_not_share_coverage() {
        let regions = tracker().await;
        let bounds = BoundingBox::new(0, 10, 0, 10);
        regions.mark_explored(EntityKind::BusStation, bounds).await.unwrap();

        assert!(!regions.is_explored(EntityKind::BikeStation, bounds, TTL).await.unwrap());
    }

    #[tokio::test]
    async fn test_ttl_boundary() {
        let regions = tracker().await;
        let bounds = BoundingBox::new(0, 10, 0, 10);
        regions.mark_explored(EntityKind::BusStation, bounds).await.unwrap();

        assert!(regions
            .is_explored(EntityKind::BusStation, bounds, Duration::from_secs(1))
            .await
            .unwrap());

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(!regions
            .is_explored(EntityKind::BusStation, bounds, Duration::from_secs(1))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_mark_normalizes_raw_boxes() {
        let regions = tracker().await;
        let reversed = BoundingBox::new(10_000_000, 0, 10_000_000, 0);
        regions.mark_explored(EntityKind::SubwayStation, reversed).await.unwrap();

        let inner = BoundingBox::new(1_000_000, 2_000_000, 1_000_000, 2_000_000);
        assert!(regions.is_explored(EntityKind::SubwayStation, inner, TTL).await.unwrap());
    }

    #[tokio::test]
    async fn test_world_coverage_answers_any_query() {
        let regions = tracker().await;
        regions.mark_explored(EntityKind::BikeStation, BoundingBox::WORLD).await.unwrap();

        let anywhere = BoundingBox::new(-1_700_000, -1_600_000, 48_050_000, 48_150_000);
        assert!(regions.is_explored(EntityKind::BikeStation, anywhere, TTL).await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_expired_deletes_only_stale_rows() {
        let regions = tracker().await;
        regions
            .mark_explored(EntityKind::BusStation, BoundingBox::new(0, 10, 0, 10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        regions
            .mark_explored(EntityKind::BusStation, BoundingBox::new(20, 30, 20, 30))
            .await
            .unwrap();

        let deleted = regions
            .purge_expired(EntityKind::BusStation, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        assert!(regions
            .is_explored(EntityKind::BusStation, BoundingBox::new(20, 30, 20, 30), TTL)
            .await
            .unwrap());
        assert!(!regions
            .is_explored(EntityKind::BusStation, BoundingBox::new(0, 10, 0, 10), TTL)
            .await
            .unwrap());
    }
}
