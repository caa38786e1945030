//! Cache Error Handler Module
//!
//! Decides what happens when a cache read, write or eviction fails.

use tracing::warn;

use crate::error::{CacheError, Result};

// == Cache Error Handler ==
/// Policy applied to failures of cache operations.
///
/// Returning `Ok(())` swallows the failure: reads then behave as a miss and
/// writes or evictions as a no-op. Returning `Err` hands it to the caller.
pub trait CacheErrorHandler: Send + Sync + std::fmt::Debug {
    fn on_get_error(&self, cache: &str, key: &str, err: CacheError) -> Result<()>;
    fn on_put_error(&self, cache: &str, key: &str, err: CacheError) -> Result<()>;
    fn on_evict_error(&self, cache: &str, key: &str, err: CacheError) -> Result<()>;
}

// == Ignore Error Handler ==
/// Logs failures and carries on, so a degraded cache never fails a request.
///
/// Every miss it produces sends the caller to the primary data source, which
/// then takes the full load while the cache is down.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreErrorHandler;

impl CacheErrorHandler for IgnoreErrorHandler {
    fn on_get_error(&self, cache: &str, key: &str, err: CacheError) -> Result<()> {
        warn!(cache, key, error = %err, "cache read failed, treating as miss");
        Ok(())
    }

    fn on_put_error(&self, cache: &str, key: &str, err: CacheError) -> Result<()> {
        warn!(cache, key, error = %err, "cache write failed, value not cached");
        Ok(())
    }

    fn on_evict_error(&self, cache: &str, key: &str, err: CacheError) -> Result<()> {
        warn!(cache, key, error = %err, "cache eviction failed");
        Ok(())
    }
}

// == Propagating Error Handler ==
/// Hands every failure back to the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropagatingErrorHandler;

impl CacheErrorHandler for PropagatingErrorHandler {
    fn on_get_error(&self, _cache: &str, _key: &str, err: CacheError) -> Result<()> {
        Err(err)
    }

    fn on_put_error(&self, _cache: &str, _key: &str, err: CacheError) -> Result<()> {
        Err(err)
    }

    fn on_evict_error(&self, _cache: &str, _key: &str, err: CacheError) -> Result<()> {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    fn refused() -> CacheError {
        BackendError::Connection("connection refused".to_string()).into()
    }

    #[test]
    fn test_ignore_handler_swallows_every_failure() {
        let handler = IgnoreErrorHandler;
        assert!(handler.on_get_error("users", "k", refused()).is_ok());
        assert!(handler.on_put_error("users", "k", refused()).is_ok());
        assert!(handler.on_evict_error("users", "k", refused()).is_ok());
    }

    #[test]
    fn test_propagating_handler_returns_failure() {
        let handler = PropagatingErrorHandler;
        assert!(matches!(
            handler.on_get_error("users", "k", refused()),
            Err(CacheError::Backend(BackendError::Connection(_)))
        ));
        assert!(handler.on_put_error("users", "k", refused()).is_err());
        assert!(handler.on_evict_error("users", "k", refused()).is_err());
    }
}
