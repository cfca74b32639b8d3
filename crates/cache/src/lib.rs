//! Cache layer: a small store abstraction plus per-entity key builders.
//!
//! The rest of the system talks to [`Cache`], a JSON-serializing facade
//! over a [`CacheStore`] backend. Two backends exist: Redis for
//! production and an in-memory map for tests and cache-less deployments.
//! Keys are built by [`keys::CacheKeys`] so every call site produces the
//! same key for the same logical request.

pub mod keys;
pub mod memory;
pub mod redis_cache;
pub mod store;

pub use keys::CacheKeys;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
pub use store::{Cache, CacheError, CacheStore};
