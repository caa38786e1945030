//! In-Memory Backend Module
//!
//! Process-local backend combining HashMap storage with LRU tracking and TTL
//! expiration. Used when no Redis URL is configured and in tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::backend::{BackendResult, CacheBackend};
use crate::cache::clock::{Clock, SystemClock};
use crate::cache::{CacheEntry, LruTracker};

// == Memory Store ==
#[derive(Debug)]
struct MemoryStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    max_entries: usize,
    evictions: u64,
}

impl MemoryStore {
    fn remove(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }

    fn insert(&mut self, key: &str, entry: CacheEntry) {
        // A full store makes room by dropping the least recently used key
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
                self.evictions += 1;
            }
        }
        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);
    }
}

// == Memory Backend ==
/// Shared in-process backend. Clones refer to the same store.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    store: Arc<RwLock<MemoryStore>>,
    clock: Arc<dyn Clock>,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates a backend holding at most `max_entries` keys, on the system clock.
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    /// Creates a backend that reads time from `clock`.
    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                max_entries: max_entries.max(1),
                evictions: 0,
            })),
            clock,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut store = self.store.write().await;

        let expired: Vec<String> = store
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            store.remove(key);
        }

        expired.len()
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.store.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.entries.is_empty()
    }

    /// Entries dropped to respect the capacity bound.
    pub async fn capacity_evictions(&self) -> u64 {
        self.store.read().await.evictions
    }

    /// Remaining lifetime of a live entry.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        let store = self.store.read().await;
        store
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| Duration::from_millis(entry.ttl_remaining_ms(now)))
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        let now = self.clock.now_ms();
        // Write lock: reads refresh LRU order and drop expired entries
        let mut store = self.store.write().await;

        let expired = match store.entries.get(key) {
            None => return Ok(None),
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            store.remove(key);
            return Ok(None);
        }

        store.lru.touch(key);
        Ok(store.entries.get(key).map(|entry| entry.payload.clone()))
    }

    async fn set_with_ttl(&self, key: &str, payload: String, ttl: Duration) -> BackendResult<()> {
        let entry = CacheEntry::new(payload, self.clock.now_ms(), ttl.as_millis() as u64);
        self.store.write().await.insert(key, entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> BackendResult<()> {
        self.store.write().await.remove(key);
        Ok(())
    }
}
