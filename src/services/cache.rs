use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use crate::services::store::{KeyValueStore, StoreError};

/// Redis-backed key-value store
///
/// Values are written without expiry; the store is a durable mirror, not a cache.
pub struct RedisStore {
    // Store ConnectionManager in a Mutex for interior mutability
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    namespace: String,
}

impl RedisStore {
    /// Connect to Redis; every key is prefixed with `namespace:`
    pub async fn new(redis_url: &str, namespace: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            namespace: namespace.into(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        namespaced_key(&self.namespace, key)
    }
}

fn namespaced_key(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", namespace, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let key = self.namespaced(key);

        let mut conn = self.redis.lock().await;
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Redis GET {}: {}", key, if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let key = self.namespaced(key);

        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg(value)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Redis SET {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.redis.lock().await;
        let pong: Result<String, redis::RedisError> =
            redis::cmd("PING").query_async(&mut *conn).await;
        pong.is_ok()
    }
}
