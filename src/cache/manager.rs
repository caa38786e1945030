//! Cache Manager Module
//!
//! Hands out named cache handles that share one backend, codec, error
//! handler and set of counters.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::cache::backend::{BackendResult, CacheBackend};
use crate::cache::codec::{CacheValue, CachedValue, TypedJsonCodec};
use crate::cache::error_handler::{CacheErrorHandler, IgnoreErrorHandler};
use crate::cache::stats::{CacheCounters, CacheStats};
use crate::error::{BackendError, CacheError, Result};

/// Lifetime given to entries written without an explicit TTL.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Upper bound on a single backend command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

// == Cache Config ==
/// Settings shared by every cache of a manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for writes that do not name one
    pub default_ttl: Duration,
    /// Prefix stored keys with `<cache name>::`
    pub use_key_prefix: bool,
    /// A backend call running longer than this counts as failed
    pub command_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            use_key_prefix: true,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

struct Shared {
    backend: Arc<dyn CacheBackend>,
    codec: TypedJsonCodec,
    config: CacheConfig,
    handler: Arc<dyn CacheErrorHandler>,
    counters: CacheCounters,
    names: Mutex<BTreeSet<String>>,
}

// == Cache Manager ==
/// Entry point for cache access.
#[derive(Clone)]
pub struct CacheManager {
    shared: Arc<Shared>,
}

impl CacheManager {
    // == Constructors ==
    /// Creates a manager that logs and ignores backend failures.
    pub fn new(backend: Arc<dyn CacheBackend>, codec: TypedJsonCodec, config: CacheConfig) -> Self {
        Self::with_error_handler(backend, codec, config, Arc::new(IgnoreErrorHandler))
    }

    pub fn with_error_handler(
        backend: Arc<dyn CacheBackend>,
        codec: TypedJsonCodec,
        config: CacheConfig,
        handler: Arc<dyn CacheErrorHandler>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                codec,
                config,
                handler,
                counters: CacheCounters::new(),
                names: Mutex::new(BTreeSet::new()),
            }),
        }
    }

    // == Cache ==
    /// Returns the handle for `name`, creating it on first use.
    pub fn cache(&self, name: &str) -> Cache {
        self.shared
            .names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string());

        Cache {
            name: Arc::from(name),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Names of caches handed out so far, sorted.
    pub fn cache_names(&self) -> Vec<String> {
        self.shared
            .names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> CacheStats {
        self.shared.counters.snapshot()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.shared.config
    }

    pub fn codec(&self) -> &TypedJsonCodec {
        &self.shared.codec
    }

    pub fn backend_name(&self) -> &'static str {
        self.shared.backend.name()
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("backend", &self.shared.backend.name())
            .field("config", &self.shared.config)
            .field("handler", &self.shared.handler)
            .finish()
    }
}

// == Cache ==
/// A named cache. Cheap to clone.
#[derive(Clone)]
pub struct Cache {
    name: Arc<str>,
    shared: Arc<Shared>,
}

impl Cache {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key as stored in the backend.
    pub fn storage_key(&self, key: &str) -> String {
        if self.shared.config.use_key_prefix {
            format!("{}::{}", self.name, key)
        } else {
            key.to_string()
        }
    }

    // == Get ==
    /// Reads and decodes a `T`.
    ///
    /// Backend failures and undecodable payloads go to the error handler;
    /// when it swallows them the read is a miss.
    pub async fn get<T: CacheValue>(&self, key: &str) -> Result<Option<T>> {
        let Some(payload) = self.fetch(key).await? else {
            return Ok(None);
        };

        match self.shared.codec.decode::<T>(&payload) {
            Ok(value) => {
                self.shared.counters.record_hit();
                debug!(cache = %self.name, key, "cache hit");
                Ok(Some(value))
            }
            Err(err) => {
                self.read_failed(key, err)?;
                Ok(None)
            }
        }
    }

    /// Reads a value of whatever registered type was stored under `key`.
    pub async fn get_any(&self, key: &str) -> Result<Option<CachedValue>> {
        let Some(payload) = self.fetch(key).await? else {
            return Ok(None);
        };

        match self.shared.codec.decode_any(&payload) {
            Ok(value) => {
                self.shared.counters.record_hit();
                debug!(cache = %self.name, key, tag = value.tag(), "cache hit");
                Ok(Some(value))
            }
            Err(err) => {
                self.read_failed(key, err)?;
                Ok(None)
            }
        }
    }

    // == Put ==
    /// Writes `value` with the default TTL. `None` is never stored.
    pub async fn put<T: CacheValue>(&self, key: &str, value: Option<&T>) -> Result<()> {
        match value {
            Some(value) => self.put_with_ttl(key, value, self.shared.config.default_ttl).await,
            None => {
                self.shared.counters.record_skipped_null();
                debug!(cache = %self.name, key, "null value not cached");
                Ok(())
            }
        }
    }

    /// Writes `value` with an explicit TTL.
    ///
    /// Encoding failures are returned; backend failures go to the error handler.
    pub async fn put_with_ttl<T: CacheValue>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let payload = self.shared.codec.encode(value)?;
        let storage_key = self.storage_key(key);

        match self
            .bounded(self.shared.backend.set_with_ttl(&storage_key, payload, ttl))
            .await
        {
            Ok(()) => {
                self.shared.counters.record_put();
                debug!(cache = %self.name, key, ttl_ms = ttl.as_millis() as u64, "cache put");
                Ok(())
            }
            Err(err) => {
                self.shared
                    .handler
                    .on_put_error(&self.name, key, err.into())?;
                self.shared.counters.record_suppressed_error();
                Ok(())
            }
        }
    }

    // == Evict ==
    pub async fn evict(&self, key: &str) -> Result<()> {
        let storage_key = self.storage_key(key);

        match self.bounded(self.shared.backend.delete(&storage_key)).await {
            Ok(()) => {
                self.shared.counters.record_eviction();
                debug!(cache = %self.name, key, "cache evict");
                Ok(())
            }
            Err(err) => {
                self.shared
                    .handler
                    .on_evict_error(&self.name, key, err.into())?;
                self.shared.counters.record_suppressed_error();
                Ok(())
            }
        }
    }

    /// Raw payload lookup; `None` on a miss or a swallowed failure.
    async fn fetch(&self, key: &str) -> Result<Option<String>> {
        let storage_key = self.storage_key(key);

        match self.bounded(self.shared.backend.get(&storage_key)).await {
            Ok(Some(payload)) => Ok(Some(payload)),
            Ok(None) => {
                self.shared.counters.record_miss();
                debug!(cache = %self.name, key, "cache miss");
                Ok(None)
            }
            Err(err) => {
                self.read_failed(key, err.into())?;
                Ok(None)
            }
        }
    }

    fn read_failed(&self, key: &str, err: CacheError) -> Result<()> {
        self.shared.handler.on_get_error(&self.name, key, err)?;
        self.shared.counters.record_suppressed_error();
        self.shared.counters.record_miss();
        Ok(())
    }

    /// Runs one backend call under the command timeout. No retry.
    async fn bounded<T, F>(&self, call: F) -> BackendResult<T>
    where
        F: Future<Output = BackendResult<T>>,
    {
        let limit = self.shared.config.command_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(Some(limit.as_millis() as u64))),
        }
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").field("name", &self.name).finish()
    }
}
