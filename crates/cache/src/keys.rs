//! Deterministic cache-key construction.
//!
//! Keys follow the `domain:operation:discriminator` convention:
//!
//! ```text
//! course:id:42
//! course:paginated:{"filter":null,...,"page":{"limit":10,"page":1},...}
//! payment:user:7:paginated:{...}
//! ```
//!
//! The paginated discriminator is a canonical JSON rendering of the
//! normalized request with object keys sorted recursively, so two
//! logically-equal requests always serialize to the same key regardless
//! of how the client ordered its input. Wildcard patterns
//! (`course:paginated:*`, `payment:user:7:*`) exist for bulk invalidation
//! after writes.

use danza_core::types::DbId;
use serde::Serialize;
use serde_json::Value;

/// Key builder for one entity domain.
#[derive(Debug, Clone, Copy)]
pub struct CacheKeys {
    domain: &'static str,
}

impl CacheKeys {
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    /// Key for a single entity instance.
    pub fn by_id(&self, id: DbId) -> String {
        format!("{}:id:{}", self.domain, id)
    }

    /// Key for one paginated listing.
    pub fn paginated<R: Serialize>(&self, request: &R) -> String {
        format!("{}:paginated:{}", self.domain, canonical_json(request))
    }

    /// Key for one user-scoped paginated listing.
    pub fn paginated_for_user<R: Serialize>(&self, user_id: DbId, request: &R) -> String {
        format!(
            "{}:user:{}:paginated:{}",
            self.domain,
            user_id,
            canonical_json(request)
        )
    }

    /// Pattern matching every key in this domain.
    pub fn all(&self) -> String {
        format!("{}:*", self.domain)
    }

    /// Pattern matching every paginated listing in this domain.
    pub fn all_paginated(&self) -> String {
        format!("{}:paginated:*", self.domain)
    }

    /// Pattern matching every key scoped to one user.
    pub fn all_for_user(&self, user_id: DbId) -> String {
        format!("{}:user:{}:*", self.domain, user_id)
    }
}

/// Serialize a value to canonical JSON: compact, object keys sorted
/// recursively. Plain `to_string` would leak map insertion order into the
/// key and split the cache across logically-equal requests.
pub fn canonical_json<R: Serialize>(value: &R) -> String {
    let value = serde_json::to_value(value).unwrap_or(Value::Null);
    let mut out = String::new();
    write_canonical(&value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        leaf => out.push_str(&leaf.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COURSE: CacheKeys = CacheKeys::new("course");

    #[test]
    fn by_id_key_shape() {
        assert_eq!(COURSE.by_id(42), "course:id:42");
    }

    #[test]
    fn paginated_key_is_deterministic_across_key_order() {
        // Same logical request, different object key order.
        let a: Value =
            serde_json::from_str(r#"{"page":1,"limit":10,"sort":{"field":"slug","order":"asc"}}"#)
                .unwrap();
        let b: Value =
            serde_json::from_str(r#"{"sort":{"order":"asc","field":"slug"},"limit":10,"page":1}"#)
                .unwrap();
        assert_eq!(COURSE.paginated(&a), COURSE.paginated(&b));
    }

    #[test]
    fn paginated_key_differs_by_page() {
        let page1 = serde_json::json!({"page": 1, "limit": 10, "filter": null});
        let page2 = serde_json::json!({"page": 2, "limit": 10, "filter": null});
        assert_ne!(COURSE.paginated(&page1), COURSE.paginated(&page2));
    }

    #[test]
    fn user_scoped_keys_fall_under_user_pattern() {
        let keys = CacheKeys::new("payment");
        let key = keys.paginated_for_user(7, &serde_json::json!({"page": 1}));
        assert!(key.starts_with("payment:user:7:"));
        assert_eq!(keys.all_for_user(7), "payment:user:7:*");
    }

    #[test]
    fn patterns_cover_domain() {
        assert_eq!(COURSE.all(), "course:*");
        assert_eq!(COURSE.all_paginated(), "course:paginated:*");
    }

    #[test]
    fn canonical_json_sorts_nested_objects() {
        let v = serde_json::json!({"b": {"z": 1, "a": [ {"y": 2, "x": 3} ]}, "a": null});
        assert_eq!(
            canonical_json(&v),
            r#"{"a":null,"b":{"a":[{"x":3,"y":2}],"z":1}}"#
        );
    }
}
