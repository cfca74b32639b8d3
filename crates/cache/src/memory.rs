//! In-memory cache backend.
//!
//! Used by tests and by deployments that run without Redis. Entries expire
//! lazily: an expired entry is dropped when it is next read or when a
//! pattern sweep touches it.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::store::{CacheError, CacheStore};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// A process-local cache store.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().expect("cache lock poisoned");
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        // Expired: upgrade to a write lock to drop the entry.
        let mut entries = self.entries.write().expect("cache lock poisoned");
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_raw(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.remove(key);
        Ok(())
    }

    async fn delete_by_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.retain(|key, _| !glob_match(pattern, key));
        Ok(())
    }
}

/// Match a key against a `*`-wildcard pattern, anchored at both ends.
fn glob_match(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == key;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !key.starts_with(first) {
        return false;
    }

    let mut pos = first.len();
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match key[pos..].find(part) {
            Some(found) => pos = pos + found + part.len(),
            None => return false,
        }
    }

    if last.is_empty() {
        true
    } else {
        key.len() >= pos + last.len() && key.ends_with(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = MemoryCache::new();
        cache
            .set_raw("course:id:1", "{}".to_string(), None)
            .await
            .unwrap();
        assert_eq!(
            cache.get_raw("course:id:1").await.unwrap(),
            Some("{}".to_string())
        );
    }

    #[tokio::test]
    async fn expired_entry_reads_as_miss() {
        let cache = MemoryCache::new();
        cache
            .set_raw("k", "v".to_string(), Some(Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn pattern_delete_removes_matching_keys_only() {
        let cache = MemoryCache::new();
        cache
            .set_raw("course:paginated:a", "1".into(), None)
            .await
            .unwrap();
        cache
            .set_raw("course:paginated:b", "2".into(), None)
            .await
            .unwrap();
        cache
            .set_raw("course:id:1", "3".into(), None)
            .await
            .unwrap();

        cache.delete_by_pattern("course:paginated:*").await.unwrap();

        assert_eq!(cache.get_raw("course:paginated:a").await.unwrap(), None);
        assert_eq!(cache.get_raw("course:paginated:b").await.unwrap(), None);
        assert!(cache.get_raw("course:id:1").await.unwrap().is_some());
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("course:*", "course:id:1"));
        assert!(glob_match("course:paginated:*", "course:paginated:{}"));
        assert!(!glob_match("course:paginated:*", "course:id:1"));
        assert!(glob_match("exact", "exact"));
        assert!(!glob_match("exact", "exactly"));
        assert!(glob_match("payment:user:7:*", "payment:user:7:paginated:x"));
        assert!(!glob_match("payment:user:7:*", "payment:user:71:paginated:x"));
    }
}
