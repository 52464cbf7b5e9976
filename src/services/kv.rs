//! Shared key-value store with per-key TTL.
//!
//! Redis backs the cache in production so price quotes and idempotency
//! records are shared across processes. `MemoryKv` covers local runs
//! without Redis and doubles as the test fake.

use async_trait::async_trait;
use dashmap::DashMap;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

/// Errors from the underlying key-value store.
#[derive(Error, Debug)]
pub enum KvError {
    #[error(transparent)]
    Redis(#[from] redis::RedisError),
}

/// String key-value store with TTL-on-write expiry.
///
/// Expiry is purely time-based; there is no invalidation API.
#[async_trait]
pub trait TtlStore: Send + Sync {
    /// Get the live value for a key, or `None` on miss/expiry.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Store a value, overwriting any prior one, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KvError>;
}

/// Redis-backed store.
#[derive(Clone)]
pub struct RedisKv {
    conn: ConnectionManager,
}

impl RedisKv {
    /// Connect to Redis at the given URL.
    pub async fn connect(redis_url: &str) -> RedisResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Connected to Redis at {}", redis_url);
        Ok(Self { conn })
    }
}

#[async_trait]
impl TtlStore for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
        Ok(())
    }
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// In-process store with the same TTL semantics as Redis.
#[derive(Default)]
pub struct MemoryKv {
    data: DashMap<String, MemoryEntry>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TtlStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let Some(entry) = self.data.get(key) else {
            return Ok(None);
        };
        if entry.expires_at > Instant::now() {
            Ok(Some(entry.value.clone()))
        } else {
            drop(entry);
            self.data.remove(key);
            Ok(None)
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KvError> {
        self.data.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_kv_set_and_get() {
        let kv = MemoryKv::new();

        kv.set("key1", "value1", Duration::from_secs(60)).await.unwrap();
        assert_eq!(kv.get("key1").await.unwrap(), Some("value1".to_string()));
        assert_eq!(kv.get("key2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_kv_overwrite() {
        let kv = MemoryKv::new();

        kv.set("key1", "old", Duration::from_secs(60)).await.unwrap();
        kv.set("key1", "new", Duration::from_secs(60)).await.unwrap();
        assert_eq!(kv.get("key1").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_memory_kv_expiration() {
        let kv = MemoryKv::new();

        kv.set("key1", "value1", Duration::from_millis(10)).await.unwrap();
        assert_eq!(kv.get("key1").await.unwrap(), Some("value1".to_string()));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(kv.get("key1").await.unwrap(), None);
    }
}
