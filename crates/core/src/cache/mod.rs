//! Ephemeral TTL cache for pipeline artifacts.
//!
//! Pipeline stages hand intermediate results (storyboards, result
//! descriptors) to each other through this cache instead of a persistent
//! store. Entries expire lazily: expiry is checked when a key is read, not
//! by a background sweeper. The cache is single-process only.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) > self.ttl
    }
}

/// Key/value store with per-entry time-to-live.
///
/// Every operation takes the single map lock, so each call is individually
/// atomic; [`TtlCache::update`] exposes an atomic read-modify-write so
/// callers never have to split a `get`/`set` pair across the lock.
pub struct TtlCache<V> {
    default_ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache whose entries default to `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a value under `key` with the default TTL.
    ///
    /// Overwriting replaces both the value and the creation timestamp, so
    /// the TTL restarts.
    pub async fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Store a value under `key` with an explicit TTL.
    pub async fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: Instant::now(),
                ttl,
            },
        );
        tracing::debug!(key = %key, "cache set");
    }

    /// Read the value under `key`, or `None` if absent or expired.
    ///
    /// An expired entry is removed on the way out and treated as a miss.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;
        let expired = match entries.get(key) {
            Some(entry) => entry.is_expired(Instant::now()),
            None => {
                tracing::debug!(key = %key, "cache miss");
                return None;
            }
        };
        if expired {
            entries.remove(key);
            tracing::debug!(key = %key, "cache expired");
            return None;
        }
        entries.get(key).map(|e| e.value.clone())
    }

    /// Atomically mutate the value under `key` in place.
    ///
    /// Returns true if the entry was present and live. The creation
    /// timestamp is preserved: updating does not extend the TTL. An expired
    /// entry is removed and the update is not applied.
    pub async fn update<F>(&self, key: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(Instant::now()) => {
                mutate(&mut entry.value);
                tracing::debug!(key = %key, "cache updated");
                true
            }
            Some(_) => {
                entries.remove(key);
                tracing::debug!(key = %key, "cache expired");
                false
            }
            None => false,
        }
    }

    /// Remove the entry under `key`, returning true if it was present.
    pub async fn delete(&self, key: &str) -> bool {
        let removed = self.entries.lock().await.remove(key).is_some();
        if removed {
            tracing::debug!(key = %key, "cache deleted");
        }
        removed
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
        tracing::debug!("cache cleared");
    }

    /// Number of stored entries, including ones that have expired but have
    /// not been touched since.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k", "hello".to_string()).await;
        assert_eq!(cache.get("k").await.as_deref(), Some("hello"));
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new(Duration::from_secs(5));
        cache.set("k", 1u32).await;

        advance(Duration::from_secs(4)).await;
        assert_eq!(cache.get("k").await, Some(1));

        advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await, None);
        // the expired entry was collected on read
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_survives_exactly_at_ttl() {
        let cache = TtlCache::new(Duration::from_secs(5));
        cache.set("k", 1u32).await;
        advance(Duration::from_secs(5)).await;
        assert_eq!(cache.get("k").await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_restarts_ttl() {
        let cache = TtlCache::new(Duration::from_secs(5));
        cache.set("k", 1u32).await;
        advance(Duration::from_secs(4)).await;
        cache.set("k", 2u32).await;
        advance(Duration::from_secs(4)).await;
        // 8s since the first write, but only 4s since the overwrite
        assert_eq!(cache.get("k").await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_entry_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set_with_ttl("short", 1u32, Duration::from_secs(1)).await;
        cache.set("long", 2u32).await;

        advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("short").await, None);
        assert_eq!(cache.get("long").await, Some(2));
    }

    #[tokio::test]
    async fn test_update_mutates_in_place() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k", vec![1u32]).await;

        let applied = cache.update("k", |v| v.push(2)).await;
        assert!(applied);
        assert_eq!(cache.get("k").await, Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_update_absent_key_is_noop() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        assert!(!cache.update("missing", |v| *v += 1).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_does_not_extend_ttl() {
        let cache = TtlCache::new(Duration::from_secs(5));
        cache.set("k", 1u32).await;

        advance(Duration::from_secs(3)).await;
        assert!(cache.update("k", |v| *v = 2).await);

        // 6s after creation: the update 3s ago did not restart the clock
        advance(Duration::from_secs(3)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_expired_entry_is_rejected() {
        let cache = TtlCache::new(Duration::from_secs(5));
        cache.set("k", 1u32).await;
        advance(Duration::from_secs(6)).await;

        assert!(!cache.update("k", |v| *v = 2).await);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1u32).await;
        cache.set("b", 2u32).await;

        assert!(cache.delete("a").await);
        assert!(!cache.delete("a").await);
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
