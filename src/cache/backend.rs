//! Cache Backend Module
//!
//! Transport seam between the cache manager and a key-value store.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BackendError;

/// Result type for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

// == Cache Backend ==
/// Key-value store with per-entry expiration.
///
/// Implementations must be shareable across request tasks; any connection
/// pooling or multiplexing happens inside the implementation.
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Reads a payload. Expired entries read as `None`.
    async fn get(&self, key: &str) -> BackendResult<Option<String>>;

    /// Writes a payload that expires after `ttl`.
    async fn set_with_ttl(&self, key: &str, payload: String, ttl: Duration) -> BackendResult<()>;

    /// Removes a key. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> BackendResult<()>;
}
