//! Caching layers over the open-data feed.
//!
//! Two very different lifetimes are involved:
//!
//! - Route geometry (which stops each line calls at) changes rarely, so
//!   sequence lookups are memoized per key in `moka` caches with a long TTL.
//! - The full live estimates snapshot is expensive to fetch but goes stale
//!   in seconds. It lives in a single-slot [`EstimatesCache`] shared by the
//!   active-line gate and the next-bus annotations of every planning call.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{Estimate, EstimatesSnapshot, SequenceEntry};
use crate::feed::{FeedClient, FeedError};
use crate::planner::TransitFeed;

/// Default lifetime of a cached estimates snapshot.
pub const DEFAULT_ESTIMATES_TTL: Duration = Duration::from_secs(30);

struct CachedSnapshot {
    snapshot: EstimatesSnapshot,
    fetched_at: Instant,
}

/// Single-slot, time-bounded cache of the full estimates collection.
///
/// Construct one per process and share it. Concurrent callers that all find
/// the slot stale will each fetch; the last writer wins. Nothing depends on
/// fetching exactly once per TTL window.
pub struct EstimatesCache {
    ttl: Duration,
    slot: RwLock<Option<CachedSnapshot>>,
}

impl EstimatesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached snapshot if it is younger than the TTL.
    pub async fn fresh(&self) -> Option<EstimatesSnapshot> {
        let guard = self.slot.read().await;
        guard
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.snapshot.clone())
    }

    /// Time since the slot was last filled, if it ever was.
    pub async fn age(&self) -> Option<Duration> {
        let guard = self.slot.read().await;
        guard.as_ref().map(|cached| cached.fetched_at.elapsed())
    }

    /// Return the cached snapshot, calling `fetch` only when it is missing
    /// or expired.
    pub async fn get_with<F, Fut, E>(&self, fetch: F) -> Result<EstimatesSnapshot, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Estimate>, E>>,
    {
        if let Some(snapshot) = self.fresh().await {
            return Ok(snapshot);
        }
        self.refresh_with(fetch).await
    }

    /// Unconditionally refetch and store. On error the slot is untouched.
    pub async fn refresh_with<F, Fut, E>(&self, fetch: F) -> Result<EstimatesSnapshot, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Estimate>, E>>,
    {
        let snapshot = Arc::new(fetch().await?);
        debug!(estimates = snapshot.len(), "refreshed estimates snapshot");

        let mut guard = self.slot.write().await;
        *guard = Some(CachedSnapshot {
            snapshot: snapshot.clone(),
            fetched_at: Instant::now(),
        });

        Ok(snapshot)
    }
}

impl Default for EstimatesCache {
    fn default() -> Self {
        Self::new(DEFAULT_ESTIMATES_TTL)
    }
}

/// Configuration for the geometry caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached sequence lookups.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

type SequenceEntryList = Arc<Vec<SequenceEntry>>;

/// Feed client with memoized route-geometry lookups.
///
/// Live estimates always go to the network; only static sequences are cached.
pub struct CachedFeedClient {
    client: FeedClient,
    by_stop: MokaCache<String, SequenceEntryList>,
    by_lines: MokaCache<BTreeSet<String>, SequenceEntryList>,
}

impl CachedFeedClient {
    pub fn new(client: FeedClient, config: &CacheConfig) -> Self {
        let by_stop = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let by_lines = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            client,
            by_stop,
            by_lines,
        }
    }

    /// Sequence entries at a stop, using the cache if available.
    pub async fn stop_sequence(&self, stop_id: &str) -> Result<SequenceEntryList, FeedError> {
        if let Some(cached) = self.by_stop.get(stop_id).await {
            return Ok(cached);
        }

        let entries = Arc::new(self.client.sequence_by_stop(stop_id).await?);
        self.by_stop
            .insert(stop_id.to_string(), entries.clone())
            .await;
        Ok(entries)
    }

    /// Full sequences for a set of lines, using the cache if available.
    pub async fn line_sequences(
        &self,
        lines: &BTreeSet<String>,
    ) -> Result<SequenceEntryList, FeedError> {
        if let Some(cached) = self.by_lines.get(lines).await {
            return Ok(cached);
        }

        let entries = Arc::new(self.client.sequence_by_lines(lines).await?);
        self.by_lines.insert(lines.clone(), entries.clone()).await;
        Ok(entries)
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &FeedClient {
        &self.client
    }

    /// Number of cached sequence lookups. Eventually consistent.
    pub fn cache_entry_count(&self) -> u64 {
        self.by_stop.entry_count() + self.by_lines.entry_count()
    }
}

impl TransitFeed for CachedFeedClient {
    async fn sequence_by_stop(&self, stop_id: &str) -> Result<Vec<SequenceEntry>, FeedError> {
        self.stop_sequence(stop_id)
            .await
            .map(|entries| entries.as_ref().clone())
    }

    async fn sequence_by_lines(
        &self,
        lines: &BTreeSet<String>,
    ) -> Result<Vec<SequenceEntry>, FeedError> {
        self.line_sequences(lines)
            .await
            .map(|entries| entries.as_ref().clone())
    }

    async fn estimates_by_stop(&self, stop_id: &str) -> Result<Vec<Estimate>, FeedError> {
        self.client.estimates_by_stop(stop_id).await
    }

    async fn all_estimates(&self) -> Result<Vec<Estimate>, FeedError> {
        self.client.all_estimates().await
    }
}
