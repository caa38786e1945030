//! Cache Entry Module
//!
//! Stored payload plus its expiration deadline, as held by the in-memory backend.

// == Cache Entry ==
/// A serialized payload with its write time and expiration deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized payload
    pub payload: String,
    /// Write timestamp (Unix milliseconds)
    pub written_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry written at `now_ms` that lives for `ttl_ms`.
    pub fn new(payload: String, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            payload,
            written_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now_ms` reaches its deadline.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    /// Remaining lifetime in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }
}
