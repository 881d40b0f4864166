//! Redis-backed key-value store with a fixed default TTL.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `VAULTGATE_CACHE_ENABLED`: set to "false" to disable caching (default: true)
//! - `REDIS_URL`: Redis connection URL (default: redis://127.0.0.1:6379)
//! - `VAULTGATE_CACHE_TTL_SECS`: cache TTL in seconds (default: 3600)
//!
//! The TTL applies to every `set`; writers cannot override it per entry.
//!
//! No lock is held across a Redis round-trip: the connection manager
//! multiplexes and is cloned per call, so concurrent requests never queue
//! behind each other inside this store.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use vaultgate_core::defaults;

/// Key-value cache shared by all cache managers.
#[derive(Clone)]
pub struct KeyValueCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    backend: Backend,
    ttl_seconds: u64,
}

enum Backend {
    Redis(ConnectionManager),
    /// Process-local map for tests; ignores TTL. The mutex guards only the
    /// map access itself, never an await.
    Memory(Mutex<HashMap<String, String>>),
    Disabled,
}

impl KeyValueCache {
    /// Create a cache from environment configuration.
    ///
    /// Falls back to a disabled cache when Redis is unreachable so the
    /// gateway can start without it.
    pub async fn from_env() -> Self {
        let enabled = std::env::var("VAULTGATE_CACHE_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| defaults::REDIS_URL.to_string());

        let ttl_seconds: u64 = std::env::var("VAULTGATE_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults::CACHE_TTL_SECS);

        let backend = if enabled {
            match redis::Client::open(redis_url.as_str()) {
                Ok(client) => match ConnectionManager::new(client).await {
                    Ok(conn) => {
                        info!("Redis cache enabled (TTL: {}s)", ttl_seconds);
                        Backend::Redis(conn)
                    }
                    Err(e) => {
                        warn!("Failed to connect to Redis, cache disabled: {}", e);
                        Backend::Disabled
                    }
                },
                Err(e) => {
                    warn!("Invalid Redis URL, cache disabled: {}", e);
                    Backend::Disabled
                }
            }
        } else {
            info!("Cache disabled via VAULTGATE_CACHE_ENABLED=false");
            Backend::Disabled
        };

        Self {
            inner: Arc::new(CacheInner {
                backend,
                ttl_seconds,
            }),
        }
    }

    /// Create a disabled cache (every read misses, every write is a no-op).
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(CacheInner {
                backend: Backend::Disabled,
                ttl_seconds: defaults::CACHE_TTL_SECS,
            }),
        }
    }

    /// Create an in-memory cache for tests.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(CacheInner {
                backend: Backend::Memory(Mutex::new(HashMap::new())),
                ttl_seconds: defaults::CACHE_TTL_SECS,
            }),
        }
    }

    /// Get a raw value. Errors degrade to a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        match &self.inner.backend {
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                match conn.get::<_, Option<String>>(key).await {
                    Ok(Some(value)) => {
                        debug!(cache_key = key, "Cache HIT");
                        Some(value)
                    }
                    Ok(None) => {
                        debug!(cache_key = key, "Cache MISS");
                        None
                    }
                    Err(e) => {
                        error!(cache_key = key, "Redis GET error: {}", e);
                        None
                    }
                }
            }
            Backend::Memory(map) => map.lock().await.get(key).cloned(),
            Backend::Disabled => None,
        }
    }

    /// Store a value under the default TTL. Errors degrade to a no-op.
    pub async fn set(&self, key: &str, value: &str) -> bool {
        let ttl = self.inner.ttl_seconds;
        match &self.inner.backend {
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                match conn.set_ex::<_, _, ()>(key, value, ttl).await {
                    Ok(_) => {
                        debug!(cache_key = key, "Cache SET (TTL: {}s)", ttl);
                        true
                    }
                    Err(e) => {
                        error!(cache_key = key, "Redis SET error: {}", e);
                        false
                    }
                }
            }
            Backend::Memory(map) => {
                map.lock().await.insert(key.to_string(), value.to_string());
                true
            }
            Backend::Disabled => false,
        }
    }

    /// Delete one key.
    pub async fn delete(&self, key: &str) -> bool {
        match &self.inner.backend {
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                match conn.del::<_, ()>(key).await {
                    Ok(_) => {
                        debug!(cache_key = key, "Cache DELETE");
                        true
                    }
                    Err(e) => {
                        error!(cache_key = key, "Redis DEL error: {}", e);
                        false
                    }
                }
            }
            Backend::Memory(map) => map.lock().await.remove(key).is_some(),
            Backend::Disabled => false,
        }
    }

    /// Delete every key starting with `prefix`.
    ///
    /// Used to drop all collection variants for an owner id in one call.
    pub async fn delete_by_prefix(&self, prefix: &str) -> bool {
        match &self.inner.backend {
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                let pattern = format!("{}*", prefix);
                match redis::cmd("KEYS")
                    .arg(&pattern)
                    .query_async::<Vec<String>>(&mut conn)
                    .await
                {
                    Ok(keys) if !keys.is_empty() => match conn.del::<_, ()>(&keys[..]).await {
                        Ok(_) => {
                            debug!(prefix, "Cache DELETE-BY-PREFIX: removed {} keys", keys.len());
                            true
                        }
                        Err(e) => {
                            error!(prefix, "Redis prefix delete error: {}", e);
                            false
                        }
                    },
                    Ok(_) => true,
                    Err(e) => {
                        error!(prefix, "Redis KEYS error: {}", e);
                        false
                    }
                }
            }
            Backend::Memory(map) => {
                let mut map = map.lock().await;
                let before = map.len();
                map.retain(|k, _| !k.starts_with(prefix));
                map.len() < before
            }
            Backend::Disabled => false,
        }
    }

    /// Flush the whole cache.
    pub async fn clear(&self) -> bool {
        match &self.inner.backend {
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                match redis::cmd("FLUSHDB").query_async::<()>(&mut conn).await {
                    Ok(_) => {
                        info!("Cache FLUSH");
                        true
                    }
                    Err(e) => {
                        error!("Redis FLUSHDB error: {}", e);
                        false
                    }
                }
            }
            Backend::Memory(map) => {
                map.lock().await.clear();
                true
            }
            Backend::Disabled => false,
        }
    }

    /// Configured TTL.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.inner.ttl_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_never_errors() {
        let cache = KeyValueCache::disabled();
        assert!(cache.get("k").await.is_none());
        assert!(!cache.set("k", "v").await);
        assert!(!cache.delete("k").await);
        assert!(!cache.delete_by_prefix("k").await);
        assert!(!cache.clear().await);
    }

    #[tokio::test]
    async fn test_memory_set_get_delete() {
        let cache = KeyValueCache::in_memory();
        assert!(cache.set("messaging:chat:1", "payload").await);
        assert_eq!(
            cache.get("messaging:chat:1").await.as_deref(),
            Some("payload")
        );
        assert!(cache.delete("messaging:chat:1").await);
        assert!(cache.get("messaging:chat:1").await.is_none());
    }

    #[tokio::test]
    async fn test_memory_delete_by_prefix() {
        let cache = KeyValueCache::in_memory();
        cache.set("messaging:chats:u1:true", "a").await;
        cache.set("messaging:chats:u1:false", "b").await;
        cache.set("messaging:chats:u2:false", "c").await;

        assert!(cache.delete_by_prefix("messaging:chats:u1:").await);
        assert!(cache.get("messaging:chats:u1:true").await.is_none());
        assert!(cache.get("messaging:chats:u1:false").await.is_none());
        assert!(cache.get("messaging:chats:u2:false").await.is_some());
    }

    #[tokio::test]
    async fn test_memory_clear() {
        let cache = KeyValueCache::in_memory();
        cache.set("a", "1").await;
        cache.set("b", "2").await;
        assert!(cache.clear().await);
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_do_not_queue_behind_each_other() {
        let cache = KeyValueCache::in_memory();

        // Many clones hammering the same store in parallel; per-call access
        // means every task completes against the shared map.
        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..32 {
            let cache = cache.clone();
            tasks.spawn(async move {
                let key = format!("messaging:chat:{}", i);
                assert!(cache.set(&key, "payload").await);
                assert_eq!(cache.get(&key).await.as_deref(), Some("payload"));
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        assert!(cache.delete_by_prefix("messaging:chat:").await);
        assert!(cache.get("messaging:chat:0").await.is_none());
    }

    #[test]
    fn test_default_ttl() {
        let cache = KeyValueCache::disabled();
        assert_eq!(cache.ttl(), Duration::from_secs(3600));
    }
}
