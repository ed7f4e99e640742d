use async_trait::async_trait;
use bulletin::domain::response::{DeleteResponse, GetResponse, PutResponse};
use bulletin::ports::CacheStore;
use dashmap::DashMap;
use shared::{Error, Result, TtlMs};
use std::fmt::Debug;
use std::hash::Hash;
use tokio::time::Instant;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

/// In-process cache keeping an absolute deadline per entry.
///
/// Deadlines come from the tokio clock, so a paused runtime controls expiry.
/// Expired entries are dropped on read and swept on every write.
pub struct ExpiringCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    entries: DashMap<K, Entry<V>>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge_expired(&self, now: Instant) {
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }
}

impl<K, V> Default for ExpiringCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> CacheStore<K, V> for ExpiringCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    async fn put(&self, key: K, val: V, ttl: Option<TtlMs>) -> Result<PutResponse> {
        let now = Instant::now();
        self.purge_expired(now);

        let entry = Entry {
            value: val,
            expires_at: ttl.map(|t| now + t.as_duration()),
        };
        self.entries.insert(key, entry);
        Ok(PutResponse::new(true, "Successfully inserted"))
    }

    async fn get(&self, key: &K) -> Result<GetResponse<V>> {
        let now = Instant::now();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                return Ok(GetResponse::new(true, entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        Err(Error::NotFound)
    }

    async fn delete(&self, key: &K) -> Result<DeleteResponse> {
        let existed = self.entries.remove(key).is_some();
        Ok(DeleteResponse::new(existed))
    }
}

impl<K, V> Debug for ExpiringCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("entry_count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::advance;

    #[tokio::test]
    async fn test_put_get_delete() {
        let cache = ExpiringCache::new();

        cache.put("key", "value", None).await.unwrap();
        assert_eq!(cache.get(&"key").await.unwrap().message, "value");

        assert!(cache.delete(&"key").await.unwrap().deleted);
        assert!(!cache.delete(&"key").await.unwrap().deleted);
        assert!(matches!(cache.get(&"key").await, Err(Error::NotFound)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_present_until_deadline() {
        let cache = ExpiringCache::new();
        cache.put("word_counts", "{}", Some(TtlMs(20_000))).await.unwrap();

        advance(Duration::from_millis(19_999)).await;
        assert_eq!(cache.get(&"word_counts").await.unwrap().message, "{}");

        advance(Duration::from_millis(1)).await;
        assert!(matches!(
            cache.get(&"word_counts").await,
            Err(Error::NotFound)
        ));
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_swept_without_reads() {
        let cache = ExpiringCache::new();
        cache.put("a", 1, Some(TtlMs(1_000))).await.unwrap();
        cache.put("b", 2, None).await.unwrap();

        advance(Duration::from_secs(2)).await;
        cache.put("c", 3, Some(TtlMs(1_000))).await.unwrap();

        assert_eq!(cache.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_replaces_value_and_deadline() {
        let cache = ExpiringCache::new();
        cache.put("key", "old", Some(TtlMs(1_000))).await.unwrap();

        advance(Duration::from_millis(900)).await;
        cache.put("key", "new", Some(TtlMs(1_000))).await.unwrap();

        advance(Duration::from_millis(900)).await;
        assert_eq!(cache.get(&"key").await.unwrap().message, "new");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_without_ttl_never_expires() {
        let cache = ExpiringCache::new();
        cache.put("key", "value", None).await.unwrap();

        advance(Duration::from_secs(86_400)).await;
        assert!(cache.get(&"key").await.is_ok());
    }
}
