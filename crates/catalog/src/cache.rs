//! Refresh-on-stale holder of the live [`CatalogSnapshot`].
//!
//! Readers get an `Arc` to the current snapshot; a refresh builds a new snapshot and swaps it in
//! under the write lock, so a reader never sees a partly replaced listing. Refreshes are
//! serialized by `refresh_lock`, and callers that queued behind an in-flight refresh reuse its
//! outcome instead of fetching again. A failed refresh keeps the previous snapshot and its
//! timestamp; the next stale check retries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use crate::source::CatalogSource;
use crate::types::CatalogSnapshot;

/// Default time a snapshot stays fresh.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

struct CacheState {
    snapshot: Arc<CatalogSnapshot>,
    /// Monotonic time of the last successful fetch.
    refreshed_at: Option<Instant>,
}

/// Process-wide catalog cache. Share it behind an `Arc`.
pub struct CatalogCache {
    source: Arc<dyn CatalogSource>,
    refresh_interval: Duration,
    state: RwLock<CacheState>,
    refresh_lock: Mutex<()>,
    /// Completed refresh attempts, successful or not.
    attempts: AtomicU64,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_refresh_interval(source, DEFAULT_REFRESH_INTERVAL)
    }

    pub fn with_refresh_interval(source: Arc<dyn CatalogSource>, refresh_interval: Duration) -> Self {
        Self {
            source,
            refresh_interval,
            state: RwLock::new(CacheState {
                snapshot: Arc::new(CatalogSnapshot::default()),
                refreshed_at: None,
            }),
            refresh_lock: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// The current snapshot without any staleness check or network call.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.state.read().await.snapshot.clone()
    }

    /// Number of refresh attempts made so far (successful or failed).
    pub fn refresh_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn is_stale(&self, state: &CacheState) -> bool {
        match state.refreshed_at {
            None => true,
            // An empty listing is retried on every call rather than kept for a full interval.
            Some(_) if state.snapshot.is_empty() => true,
            Some(at) => at.elapsed() >= self.refresh_interval,
        }
    }

    /// Returns the live snapshot, refreshing it first when stale. Never fails: on a failed
    /// refresh the previous (possibly empty) snapshot is returned.
    #[instrument(skip(self))]
    pub async fn get_current(&self) -> Arc<CatalogSnapshot> {
        let seen_attempts = self.attempts.load(Ordering::SeqCst);
        {
            let state = self.state.read().await;
            if !self.is_stale(&state) {
                return state.snapshot.clone();
            }
        }

        let _guard = self.refresh_lock.lock().await;
        if self.attempts.load(Ordering::SeqCst) != seen_attempts {
            debug!("Catalog refreshed by a concurrent caller; reusing its result");
            return self.snapshot().await;
        }
        self.refresh_locked().await;
        self.snapshot().await
    }

    /// Fetches the listing now, regardless of staleness. Returns whether the fetch succeeded.
    pub async fn refresh(&self) -> bool {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> bool {
        info!("step: loading catalog");
        let outcome = self.source.fetch().await;
        let ok = match outcome {
            Ok(products) => {
                let snapshot = CatalogSnapshot::new(products, Utc::now());
                let count = snapshot.len();
                let mut state = self.state.write().await;
                state.snapshot = Arc::new(snapshot);
                state.refreshed_at = Some(Instant::now());
                drop(state);
                info!(products = count, "Catalog loaded");
                true
            }
            Err(e) => {
                let state = self.state.read().await;
                error!(
                    error = %e,
                    kept_products = state.snapshot.len(),
                    "Failed to load catalog; keeping previous listing"
                );
                false
            }
        };
        self.attempts.fetch_add(1, Ordering::SeqCst);
        ok
    }
}
