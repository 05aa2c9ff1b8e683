use super::entry::{CacheEntry, Deadlines};
use super::{CacheKey, CacheMetrics};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::Record;
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Number of independently locked partitions of the keyspace.
pub const CACHE_SHARD_COUNT: usize = 16;

/// Sharded answer cache.
///
/// Each shard is a reader/writer-locked map selected by the Fx hash of the
/// key, so writers on one shard never block readers or writers on another.
/// Every method takes and releases its shard lock synchronously; nothing here
/// awaits while a lock is held.
pub struct DnsCache {
    cache: DashMap<CacheKey, CacheEntry, FxBuildHasher>,
    metrics: Arc<CacheMetrics>,
}

impl DnsCache {
    pub fn new(capacity: usize) -> Self {
        info!(
            capacity = capacity,
            shards = CACHE_SHARD_COUNT,
            "Initializing DNS cache"
        );

        let cache: DashMap<CacheKey, CacheEntry, FxBuildHasher> =
            DashMap::with_capacity_and_hasher_and_shard_amount(
                capacity,
                FxBuildHasher::default(),
                CACHE_SHARD_COUNT,
            );

        Self {
            cache,
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    /// Raw lookup under the shard read lock. Freshness is left to the caller.
    pub fn lookup(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.cache.get(key).map(|entry| entry.value().clone())
    }

    /// Lookup that only returns entries whose deadline is after `now`, and
    /// records the hit or miss.
    pub fn get_fresh(&self, key: &CacheKey, now: Instant) -> Option<CacheEntry> {
        match self.lookup(key) {
            Some(entry) if entry.is_fresh(now) => {
                self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                Some(entry)
            }
            _ => {
                self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
                None
            }
        }
    }

    /// Insert or refresh in place. The whole read-modify-write runs under the
    /// key's shard write lock.
    pub fn upsert(
        &self,
        key: CacheKey,
        answers: Arc<[Record]>,
        response_code: ResponseCode,
        deadlines: Deadlines,
    ) -> CacheEntry {
        match self.cache.entry(key) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.answers = answers;
                entry.response_code = response_code;
                entry.deadline = deadlines.deadline;
                entry.original_deadline = deadlines.original_deadline;
                self.metrics.refreshes.fetch_add(1, AtomicOrdering::Relaxed);

                debug!(key = %occupied.key(), "Refreshed cache entry");
                occupied.get().clone()
            }
            Entry::Vacant(vacant) => {
                let entry = CacheEntry::new(answers, response_code, deadlines);
                self.metrics
                    .insertions
                    .fetch_add(1, AtomicOrdering::Relaxed);

                debug!(key = %vacant.key(), "Inserted into cache");
                vacant.insert(entry.clone());
                entry
            }
        }
    }

    pub fn remove(&self, key: &CacheKey) -> bool {
        let removed = self.cache.remove(key).is_some();
        if removed {
            self.metrics.removals.fetch_add(1, AtomicOrdering::Relaxed);
            debug!(key = %key, "Removed from cache");
        }
        removed
    }

    /// Independent copy of every entry still fresh right now.
    pub fn snapshot(&self) -> HashMap<CacheKey, CacheEntry> {
        self.snapshot_at(Instant::now())
    }

    /// Shards are read-locked one at a time while they are walked; the
    /// returned map shares no mutable state with the store.
    pub fn snapshot_at(&self, now: Instant) -> HashMap<CacheKey, CacheEntry> {
        self.cache
            .iter()
            .filter(|entry| entry.value().is_fresh(now))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn shard_count(&self) -> usize {
        CACHE_SHARD_COUNT
    }

    pub fn clear(&self) {
        self.cache.clear();
        info!("Cache cleared");
    }

    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }
}
