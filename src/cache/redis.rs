//! Redis Backend Module
//!
//! Backend speaking `GET` / `PSETEX` / `DEL` to a Redis server.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use crate::cache::backend::{BackendResult, CacheBackend};

// == Redis Backend ==
/// Redis client over a shared, multiplexed connection.
///
/// `ConnectionManager` reconnects on its own; every call works on a clone of
/// it, so no caller holds a connection exclusively.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    /// Opens the client and establishes the managed connection.
    pub async fn connect(url: &str) -> BackendResult<Self> {
        info!("Connecting to Redis at {}", url);
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, payload: String, ttl: Duration) -> BackendResult<()> {
        let mut conn = self.conn.clone();
        // PSETEX rejects a zero expiry
        let millis = (ttl.as_millis() as u64).max(1);
        let _: () = conn.pset_ex(key, payload, millis).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> BackendResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}
