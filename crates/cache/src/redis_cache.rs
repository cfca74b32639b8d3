//! Redis cache backend.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use crate::store::{CacheError, CacheStore};

/// Keys deleted per `DEL` round trip during a pattern sweep.
const DELETE_BATCH: usize = 200;

/// Cache store backed by a Redis server.
pub struct RedisCache {
    client: Client,
}

impl RedisCache {
    pub fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Backend(format!("failed to open Redis client: {e}")))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(format!("Redis connection failed: {e}")))
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        conn.get(key)
            .await
            .map_err(|e| CacheError::Backend(format!("GET failed: {e}")))
    }

    async fn set_raw(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        match ttl {
            Some(ttl) if !ttl.is_zero() => {
                // Be explicit about the unit return type to avoid
                // never-type fallback.
                conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
                    .await
                    .map_err(|e| CacheError::Backend(format!("SETEX failed: {e}")))
            }
            _ => conn
                .set::<_, _, ()>(key, value)
                .await
                .map_err(|e| CacheError::Backend(format!("SET failed: {e}"))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::Backend(format!("DEL failed: {e}")))
    }

    async fn delete_by_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;

        // SCAN instead of KEYS so a large keyspace does not block the
        // server.
        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(DELETE_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| CacheError::Backend(format!("SCAN failed: {e}")))?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        for chunk in keys.chunks(DELETE_BATCH) {
            conn.del::<_, ()>(chunk.to_vec())
                .await
                .map_err(|e| CacheError::Backend(format!("DEL failed: {e}")))?;
        }
        tracing::debug!(pattern, deleted = keys.len(), "cache pattern sweep");
        Ok(())
    }
}
