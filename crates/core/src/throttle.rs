//! Minimum-interval gate around expensive bulk fetches.
//!
//! Some upstream APIs only offer a "fetch everything" call. The throttle
//! refuses to re-invoke such an operation more often than a configured
//! interval; on the throttled path the caller serves whatever is already
//! cached. The gate holds its state lock across the guarded operation, so
//! concurrent triggers collapse into a single remote call.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::Error;

/// Rate gate for one throttled operation.
///
/// State is in-memory only and resets on process restart; its only purpose
/// is to bound request rate within a running session.
#[derive(Debug)]
pub struct CallThrottle {
    last_refresh: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl CallThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self { last_refresh: Mutex::new(None), min_interval }
    }

    /// Invoke `op` unless it already ran within the minimum interval.
    ///
    /// Returns `Ok(None)` on the throttled path without invoking `op`; the
    /// caller falls back to its cache. The first call after construction is
    /// never throttled.
    ///
    /// If `op` fails, `last_refresh` is not advanced, so an immediate retry
    /// attempts the call again instead of waiting out the interval.
    pub async fn guarded_call<F, Fut, T>(&self, op: F) -> Result<Option<T>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut last = self.last_refresh.lock().await;
        if let Some(at) = *last {
            if at.elapsed() < self.min_interval {
                tracing::debug!(elapsed_ms = at.elapsed().as_millis() as u64, "bulk fetch throttled");
                return Ok(None);
            }
        }

        let value = op().await?;
        *last = Some(Instant::now());
        Ok(Some(value))
    }
}
