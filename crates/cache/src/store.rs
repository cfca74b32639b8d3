//! The cache store contract and the JSON facade over it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors from the cache layer.
///
/// Callers on the read path treat any of these as a miss; the write-side
/// invalidation path propagates them.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Minimal key/value contract every backend implements.
///
/// Values are opaque strings at this level; `delete_by_pattern` accepts
/// `*` wildcards (`"course:paginated:*"`).
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_raw(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn delete_by_pattern(&self, pattern: &str) -> Result<(), CacheError>;
}

/// Cheaply cloneable JSON facade used by handlers.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    default_ttl: Duration,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// Fetch and deserialize a cached value.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get_raw(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store a value under the default TTL.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.store.set_raw(key, raw, Some(self.default_ttl)).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key).await
    }

    pub async fn delete_by_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        self.store.delete_by_pattern(pattern).await
    }
}
