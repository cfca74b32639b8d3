//! Handler-side cache policy.
//!
//! Read paths never fail because of the cache: any error on lookup is
//! logged and treated as a miss, and a failed fill is logged and ignored.
//! Write paths are the opposite: invalidation must complete before the
//! response is returned, so those errors propagate.

use danza_cache::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppResult;

/// Cache lookup that degrades to a miss on any error.
pub async fn lookup<T: DeserializeOwned>(cache: &Cache, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(hit) => hit,
        Err(err) => {
            tracing::warn!(error = %err, key, "Cache read failed; treating as miss");
            None
        }
    }
}

/// Best-effort cache fill after a successful query.
pub async fn fill<T: Serialize>(cache: &Cache, key: &str, value: &T) {
    if let Err(err) = cache.set(key, value).await {
        tracing::warn!(error = %err, key, "Cache write failed");
    }
}

/// Invalidate the given keys/patterns after a successful write.
///
/// Runs before the HTTP response is produced so the staleness window is
/// bounded by the write itself; failures propagate.
pub async fn invalidate(cache: &Cache, keys: &[String]) -> AppResult<()> {
    for key in keys {
        if key.contains('*') {
            cache.delete_by_pattern(key).await?;
        } else {
            cache.delete(key).await?;
        }
    }
    Ok(())
}
