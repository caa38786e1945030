//! Integration Tests for the Cache Policies
//!
//! Drives the public cache API against fake backends to check key layout,
//! null handling, failure isolation and default expiry end to end.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use erp_cache::cache::{
    cached, param, BackendResult, CacheBackend, CacheConfig, CacheManager, KeyGenerator,
    ManualClock, MemoryBackend, SimpleKeyGenerator, TrustedPackages, TypeRegistry, TypedJsonCodec,
};
use erp_cache::error::{BackendError, CacheError};
use erp_cache::workflow::{ApproveGroupUser, ApproveGroupUserService, ApproveGroupUserStore};

// == Fake Backend ==

/// Memory backend that can be switched into an outage and counts calls.
#[derive(Debug, Clone)]
struct FlakyBackend {
    inner: MemoryBackend,
    down: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl FlakyBackend {
    fn new() -> Self {
        Self {
            inner: MemoryBackend::new(100),
            down: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> BackendResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            Err(BackendError::Connection("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheBackend for FlakyBackend {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set_with_ttl(&self, key: &str, payload: String, ttl: Duration) -> BackendResult<()> {
        self.check()?;
        self.inner.set_with_ttl(key, payload, ttl).await
    }

    async fn delete(&self, key: &str) -> BackendResult<()> {
        self.check()?;
        self.inner.delete(key).await
    }
}

fn codec() -> TypedJsonCodec {
    TypedJsonCodec::new(
        TypeRegistry::new(TrustedPackages::new(["erp_cache::workflow"]))
            .with::<ApproveGroupUser>()
            .unwrap(),
    )
}

fn member(num: &str) -> ApproveGroupUser {
    ApproveGroupUser {
        group_id: Some(1),
        approver_num: Some(num.to_string()),
        ..ApproveGroupUser::default()
    }
}

// == Key Layout ==

#[test]
fn test_documented_key_example() {
    let keys = SimpleKeyGenerator;
    let key = keys
        .generate("com.example.Service", "find", &[param(&42), param(&"abc")])
        .unwrap();
    assert_eq!(key, "com.example.Servicefind42abc");

    let colliding = keys
        .generate("com.example.Service", "find", &[param(&4), param(&"2abc")])
        .unwrap();
    assert_eq!(key, colliding);
}

// == Outage Handling ==

#[tokio::test]
async fn test_service_survives_cache_outage() {
    let backend = FlakyBackend::new();
    let manager = CacheManager::new(Arc::new(backend.clone()), codec(), CacheConfig::default());
    let store = ApproveGroupUserStore::new();
    let service = ApproveGroupUserService::new(store.clone(), &manager);

    service.save(1, member("E1"), None).await.unwrap();
    backend.set_down(true);

    // Reads fall through to the store; writes and evictions are no-ops
    let found = service.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(found.approver_num.as_deref(), Some("E1"));
    let saved = service.save(1, member("E2"), None).await.unwrap();
    assert_eq!(saved.version_num, Some(2));

    let stats = manager.stats();
    assert_eq!(stats.suppressed_errors, 3, "get, put and evict were each swallowed");
    assert_eq!(stats.hits, 0);

    backend.set_down(false);
    let found = service.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(found.approver_num.as_deref(), Some("E2"));
}

#[tokio::test]
async fn test_failed_write_leaves_nothing_behind() {
    let backend = FlakyBackend::new();
    let manager = CacheManager::new(Arc::new(backend.clone()), codec(), CacheConfig::default());
    let cache = manager.cache("approveGroupUser");

    backend.set_down(true);
    cache.put("1", Some(&member("E1"))).await.unwrap();
    backend.set_down(false);

    assert!(backend.inner.is_empty().await);
    assert!(cache.get::<ApproveGroupUser>("1").await.unwrap().is_none());
}

// == Null Values ==

#[tokio::test]
async fn test_absent_result_never_reaches_backend() {
    let backend = FlakyBackend::new();
    let manager = CacheManager::new(Arc::new(backend.clone()), codec(), CacheConfig::default());
    let cache = manager.cache("approveGroupUser");

    cache.put::<ApproveGroupUser>("1", None).await.unwrap();
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

    let result: Result<Option<ApproveGroupUser>, CacheError> = cached(
        &cache,
        &SimpleKeyGenerator,
        "erp_cache::workflow::Lookup",
        "find",
        &[param(&2)],
        || async { Ok(None) },
    )
    .await;

    assert!(matches!(result, Ok(None)));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1, "only the read went out");
    assert!(backend.inner.is_empty().await);
}

// == Default Expiry ==

#[tokio::test]
async fn test_default_ttl_is_thirty_seconds() {
    let clock = ManualClock::new(1_637_309_892_000);
    let backend = MemoryBackend::with_clock(100, Arc::new(clock.clone()));
    let manager = CacheManager::new(Arc::new(backend.clone()), codec(), CacheConfig::default());
    let cache = manager.cache("approveGroupUser");

    cache.put("1", Some(&member("E1"))).await.unwrap();
    assert_eq!(
        backend.ttl_remaining("approveGroupUser::1").await,
        Some(Duration::from_secs(30))
    );

    clock.advance(Duration::from_secs(31));
    assert!(cache.get::<ApproveGroupUser>("1").await.unwrap().is_none());
}
