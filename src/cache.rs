//! Time-to-live memoization for loaded seasons and computed reports.
//!
//! The cache is a plain value owned by whoever needs it (the API state holds
//! one per kind of entry). Entries are independent: each expires `ttl` after
//! its own insertion, and a key returns the same value until then.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

/// Thread-safe TTL cache. Cloning shares the underlying map.
#[derive(Clone)]
pub struct TtlCache<K, V> {
    inner: Arc<RwLock<HashMap<K, Entry<V>>>>,
    ttl: Duration,
}

struct Entry<V> {
    inserted_at: Instant,
    value: V,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value for `key`, or `None` if absent or expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let inner = self.inner.read().await;
        match inner.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                debug!("Cache hit: {:?}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Cache expired: {:?}", key);
                None
            }
            None => {
                debug!("Cache miss: {:?}", key);
                None
            }
        }
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.write().await;
        inner.insert(
            key,
            Entry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    /// Return the cached value, or run `load` and cache its result. Errors
    /// are not cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }
        let value = load().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    /// Drop expired entries. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.len();
        let ttl = self.ttl;
        inner.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        before - inner.len()
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
