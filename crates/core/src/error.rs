//! Unified error types for the station cache.

use tokio_rusqlite::rusqlite;

use crate::model::EntityKind;

/// Unified error type for cache and provider operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested id has no cached or remote representation.
    #[error("NOT_FOUND: {kind}/{id}")]
    NotFound { kind: EntityKind, id: String },

    /// The remote client failed (network, protocol, non-success status).
    #[error("REMOTE_ERROR: {0}")]
    Remote(String),

    /// Database operation failed.
    #[error("STORAGE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORAGE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row or payload could not be decoded.
    #[error("STORAGE_ERROR: corrupt row: {0}")]
    Corrupt(String),

    /// Entity carries an empty id; callers must never hand these to the store.
    #[error("INVALID_ENTITY: empty id for kind {0}")]
    EmptyId(EntityKind),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
