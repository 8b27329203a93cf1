//! Venue listing cache
//!
//! Two tiers sharing one TTL:
//! - memory: authoritative for the process lifetime
//! - disk (`ListingStore`): survives restarts, freshness by write time
//!
//! A fetch only happens when neither tier holds a fresh, non-empty snapshot.
//! Stale data is never served; a failed fetch is `PoolDiscoveryUnavailable`.

pub mod conversion;
pub mod fetcher;
pub mod store;
pub mod types;

pub use fetcher::{HttpListingFetcher, ListingFetcher};
pub use store::{FileListingStore, ListingStore};
pub use types::{ListingSnapshot, PairKey, PoolRecord};

use crate::errors::{SwapError, SwapResult};
use crate::logger::{self, LogTag};
use crate::venues::Venue;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

#[derive(Clone)]
struct ListingCacheEntry {
    snapshot: ListingSnapshot,
    fetched_at: Instant,
}

impl ListingCacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ListingCacheMetrics {
    pub entries: usize,
    pub fresh_entries: usize,
    pub stale_entries: usize,
}

type CacheKey = (Venue, PairKey);

pub struct ListingCache {
    memory: RwLock<HashMap<CacheKey, ListingCacheEntry>>,
    store: Option<Arc<dyn ListingStore>>,
    fetcher: Arc<dyn ListingFetcher>,
    ttl: Duration,
}

impl ListingCache {
    pub fn new(
        fetcher: Arc<dyn ListingFetcher>,
        store: Option<Arc<dyn ListingStore>>,
        ttl: Duration,
    ) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            store,
            fetcher,
            ttl,
        }
    }

    /// Cache wired to the venue HTTP APIs and the on-disk store from config
    pub fn from_config() -> Self {
        let cache = crate::config::with_config(|cfg| cfg.cache.clone());

        let store: Option<Arc<dyn ListingStore>> = if cache.disk_enabled {
            let directory = cache
                .directory
                .as_ref()
                .map(std::path::PathBuf::from)
                .unwrap_or_else(crate::paths::get_listings_cache_directory);
            Some(Arc::new(FileListingStore::new(directory)))
        } else {
            None
        };

        Self::new(
            Arc::new(HttpListingFetcher::from_config()),
            store,
            cache.listing_ttl(),
        )
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh snapshot for `(venue, pair)`: memory, then disk, then network
    pub async fn get_listings(&self, venue: Venue, pair: &PairKey) -> SwapResult<ListingSnapshot> {
        let key = (venue, pair.clone());

        if let Some(snapshot) = self.memory_hit(&key) {
            logger::debug(
                LogTag::Cache,
                &format!("Memory hit for {} {} ({} pools)", venue, pair, snapshot.len()),
            );
            return Ok(snapshot);
        }

        if let Some(snapshot) = self.disk_hit(&key) {
            logger::debug(
                LogTag::Cache,
                &format!("Disk hit for {} {} ({} pools)", venue, pair, snapshot.len()),
            );
            return Ok(snapshot);
        }

        let snapshot = self.fetcher.fetch_pair(venue, pair).await.map_err(|reason| {
            logger::warning(
                LogTag::Cache,
                &format!("Listing fetch failed for {} {}: {}", venue, pair, reason),
            );
            SwapError::PoolDiscoveryUnavailable {
                venue: venue.to_string(),
                pair: pair.to_string(),
                reason,
            }
        })?;

        self.memory.write().insert(
            key,
            ListingCacheEntry {
                snapshot: snapshot.clone(),
                fetched_at: Instant::now(),
            },
        );

        if let Some(store) = &self.store {
            if let Err(e) = store.save(venue, pair, &snapshot) {
                logger::debug(
                    LogTag::Cache,
                    &format!("Listing disk write skipped for {} {}: {}", venue, pair, e),
                );
            }
        }

        logger::info(
            LogTag::Cache,
            &format!("Fetched {} listings for {}: {} pools", venue, pair, snapshot.len()),
        );

        Ok(snapshot)
    }

    fn memory_hit(&self, key: &CacheKey) -> Option<ListingSnapshot> {
        let guard = self.memory.read();
        let entry = guard.get(key)?;
        if entry.is_fresh(self.ttl) && !entry.snapshot.is_empty() {
            Some(entry.snapshot.clone())
        } else {
            None
        }
    }

    fn disk_hit(&self, key: &CacheKey) -> Option<ListingSnapshot> {
        let store = self.store.as_ref()?;
        let (snapshot, written_at) = store.load(key.0, &key.1)?;

        // A modification time in the future is a miss
        let age = SystemTime::now().duration_since(written_at).ok()?;
        if age >= self.ttl || snapshot.is_empty() {
            return None;
        }

        let now = Instant::now();
        self.memory.write().insert(
            key.clone(),
            ListingCacheEntry {
                snapshot: snapshot.clone(),
                fetched_at: now.checked_sub(age).unwrap_or(now),
            },
        );
        Some(snapshot)
    }

    /// Drop both tiers, returning the number of disk files removed
    pub fn clear(&self) -> usize {
        self.memory.write().clear();
        match &self.store {
            Some(store) => store.clear().unwrap_or_else(|e| {
                logger::warning(LogTag::Cache, &format!("Failed to clear listing files: {}", e));
                0
            }),
            None => 0,
        }
    }

    pub fn metrics(&self) -> ListingCacheMetrics {
        let guard = self.memory.read();
        let fresh_entries = guard
            .values()
            .filter(|entry| entry.is_fresh(self.ttl))
            .count();
        ListingCacheMetrics {
            entries: guard.len(),
            fresh_entries,
            stale_entries: guard.len() - fresh_entries,
        }
    }
}
