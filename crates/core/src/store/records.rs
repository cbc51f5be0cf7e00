//! Per-id entity cache operations.
//!
//! Generic CRUD over the `stations` table. The store is keyed by
//! `(kind, id)` and carries an indexed coordinate pair for area queries;
//! the entity itself is stored as a JSON payload column, opaque to SQL.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use tokio_rusqlite::params;

use super::connection::CacheDb;
use crate::Error;
use crate::geo::BoundingBox;
use crate::model::StationRecord;

/// A cached entity together with the time it was last written.
///
/// The store performs no TTL filtering itself; callers decide whether the
/// row is still trustworthy from `updated_at`.
#[derive(Debug, Clone)]
pub struct CachedEntity<E> {
    pub entity: E,
    pub updated_at: DateTime<Utc>,
}

/// Durable per-id cache for one entity kind.
///
/// All instances on the same database share one [`CacheDb`] handle; the
/// kind column keeps their rows disjoint.
#[derive(Clone, Debug)]
pub struct CacheStore<E> {
    db: CacheDb,
    _marker: PhantomData<E>,
}

impl<E: StationRecord> CacheStore<E> {
    pub fn new(db: CacheDb) -> Self {
        Self { db, _marker: PhantomData }
    }

    /// The shared database handle backing this store.
    pub fn db(&self) -> &CacheDb {
        &self.db
    }

    /// Look up a single entity by id.
    ///
    /// Returns None on a miss. No freshness check happens on this path.
    pub async fn load(&self, id: &str) -> Result<Option<CachedEntity<E>>, Error> {
        let id = id.to_string();
        self.db
            .conn
            .call(move |conn| -> Result<Option<(String, String)>, Error> {
                let mut stmt =
                    conn.prepare("SELECT payload, updated_at FROM stations WHERE kind = ?1 AND id = ?2")?;

                let result = stmt.query_row(params![E::KIND.as_str(), id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                });

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?
            .map(|(payload, updated_at)| {
                let entity = serde_json::from_str(&payload).map_err(|e| Error::Corrupt(e.to_string()))?;
                let updated_at = DateTime::parse_from_rfc3339(&updated_at)
                    .map_err(|e| Error::Corrupt(e.to_string()))?
                    .with_timezone(&Utc);
                Ok(CachedEntity { entity, updated_at })
            })
            .transpose()
    }

    /// Return all cached entities of this kind inside `bounds`, inclusive.
    ///
    /// Rows without coordinates (non-spatial kinds) never match. Returns an
    /// empty vec, not an error, when nothing matches.
    pub async fn load_by_area(&self, bounds: BoundingBox) -> Result<Vec<E>, Error> {
        let b = bounds.normalized();
        let payloads = self
            .db
            .conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT payload FROM stations
                     WHERE kind = ?1
                       AND latitude BETWEEN ?2 AND ?3
                       AND longitude BETWEEN ?4 AND ?5",
                )?;

                let rows = stmt.query_map(params![E::KIND.as_str(), b.south, b.north, b.west, b.east], |row| {
                    row.get::<_, String>(0)
                })?;

                let mut payloads = Vec::new();
                for payload in rows {
                    payloads.push(payload?);
                }
                Ok(payloads)
            })
            .await
            .map_err(Error::from)?;

        payloads
            .iter()
            .map(|payload| serde_json::from_str(payload).map_err(|e| Error::Corrupt(e.to_string())))
            .collect()
    }

    /// Insert or update a single entity.
    ///
    /// Uses UPSERT semantics keyed by `(kind, id)`; `updated_at` is set to
    /// now on every write, so repeated writes of the same entity leave the
    /// store in the same observable state.
    pub async fn replace(&self, entity: &E) -> Result<(), Error> {
        let row = encode_row(entity)?;
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(UPSERT_SQL, params![
                    E::KIND.as_str(),
                    row.id,
                    row.latitude,
                    row.longitude,
                    row.payload,
                    Utc::now().to_rfc3339()
                ])?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a batch of entities in one transaction.
    ///
    /// All-or-nothing: if any row fails (including an empty id, which is
    /// rejected before the database is touched), no row is written.
    pub async fn replace_all(&self, entities: &[E]) -> Result<(), Error> {
        let rows = entities.iter().map(encode_row).collect::<Result<Vec<_>, _>>()?;
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                let updated_at = Utc::now().to_rfc3339();
                {
                    let mut stmt = tx.prepare(UPSERT_SQL)?;
                    for row in &rows {
                        stmt.execute(params![
                            E::KIND.as_str(),
                            row.id,
                            row.latitude,
                            row.longitude,
                            row.payload,
                            updated_at
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

const UPSERT_SQL: &str = "INSERT INTO stations (kind, id, latitude, longitude, payload, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(kind, id) DO UPDATE SET
        latitude = excluded.latitude,
        longitude = excluded.longitude,
        payload = excluded.payload,
        updated_at = excluded.updated_at";

struct EncodedRow {
    id: String,
    latitude: Option<i32>,
    longitude: Option<i32>,
    payload: String,
}

fn encode_row<E: StationRecord>(entity: &E) -> Result<EncodedRow, Error> {
    if entity.id().is_empty() {
        return Err(Error::EmptyId(E::KIND));
    }
    let coords = entity.coords();
    let payload = serde_json::to_string(entity).map_err(|e| Error::Corrupt(e.to_string()))?;
    Ok(EncodedRow {
        id: entity.id().to_string(),
        latitude: coords.map(|c| c.latitude),
        longitude: coords.map(|c| c.longitude),
        payload,
    })
}
