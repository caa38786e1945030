//! Cache Module
//!
//! Typed JSON caching over a pluggable key-value backend: key generation,
//! discriminator-based serialization, error isolation and TTL-bound named
//! caches.

mod backend;
mod cacheable;
mod clock;
mod codec;
mod entry;
mod error_handler;
mod key;
mod lru;
mod manager;
mod memory;
mod redis;
mod stats;

// Re-export public types
pub use self::backend::{BackendResult, CacheBackend};
pub use self::cacheable::{cached, cached_by_key, evicting};
pub use self::clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use self::codec::{
    CacheValue, CachedValue, TrustedPackages, TypeRegistry, TypedJsonCodec, TYPE_PROPERTY,
};
pub use self::entry::CacheEntry;
pub use self::error_handler::{CacheErrorHandler, IgnoreErrorHandler, PropagatingErrorHandler};
pub use self::key::{opt_param, param, type_name_of, KeyGenerator, KeyParam, SimpleKeyGenerator};
pub use self::lru::LruTracker;
pub use self::manager::{Cache, CacheConfig, CacheManager, DEFAULT_COMMAND_TIMEOUT, DEFAULT_TTL};
pub use self::memory::MemoryBackend;
pub use self::redis::RedisBackend;
pub use self::stats::{CacheCounters, CacheStats};
