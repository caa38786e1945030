//! Cacheable Operations Module
//!
//! Explicit read-through and evict-after wrappers around business calls.
//!
//! ```ignore
//! let user = cached(&cache, &SimpleKeyGenerator, type_name_of::<Service>(), "find_by_id",
//!     &[param(&id)], || async { store.select_by_id(id).await }).await?;
//! ```

use std::future::Future;

use crate::cache::codec::CacheValue;
use crate::cache::key::{KeyGenerator, KeyParam};
use crate::cache::manager::Cache;
use crate::error::CacheError;

// == Cached ==
/// Returns the cached value for the derived key, or runs `compute` and caches
/// its result.
///
/// A null key argument fails before `compute` runs. A `None` result is
/// returned but never cached, so it is recomputed on the next call.
pub async fn cached<T, E, F, Fut>(
    cache: &Cache,
    keys: &dyn KeyGenerator,
    target: &str,
    operation: &str,
    params: &[KeyParam<'_>],
    compute: F,
) -> Result<Option<T>, E>
where
    T: CacheValue,
    E: From<CacheError>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let key = keys.generate(target, operation, params)?;
    cached_by_key(cache, &key, compute).await
}

/// [`cached`] with a key the caller already has.
pub async fn cached_by_key<T, E, F, Fut>(cache: &Cache, key: &str, compute: F) -> Result<Option<T>, E>
where
    T: CacheValue,
    E: From<CacheError>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    if let Some(hit) = cache.get::<T>(key).await? {
        return Ok(Some(hit));
    }

    let value = compute().await?;
    cache.put(key, value.as_ref()).await?;
    Ok(value)
}

// == Evicting ==
/// Runs `action` and, if it succeeds, evicts the derived key.
///
/// A failed action leaves the cache untouched.
pub async fn evicting<R, E, F, Fut>(
    cache: &Cache,
    keys: &dyn KeyGenerator,
    target: &str,
    operation: &str,
    params: &[KeyParam<'_>],
    action: F,
) -> Result<R, E>
where
    E: From<CacheError>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let key = keys.generate(target, operation, params)?;
    let result = action().await?;
    cache.evict(&key).await?;
    Ok(result)
}
