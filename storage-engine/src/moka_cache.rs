use async_trait::async_trait;
use bulletin::domain::response::{DeleteResponse, GetResponse, PutResponse};
use bulletin::ports::CacheStore;
use moka::Expiry;
use moka::future::Cache;
use shared::{Error, Result, TtlMs};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Value plus the TTL it was written with
#[derive(Clone, Debug)]
struct Stamped<V> {
    value: V,
    ttl: Option<Duration>,
}

/// Per-entry expiry: the TTL given to `put`, else the cache default.
/// Overwrites restart the clock.
struct EntryExpiry {
    default_ttl: Option<Duration>,
}

impl<K, V> Expiry<K, Stamped<V>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &K,
        value: &Stamped<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl.or(self.default_ttl)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        value: &Stamped<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl.or(self.default_ttl)
    }
}

/// Moka-based cache implementation with per-entry TTL support
/// Provides lock-free, concurrent cache with optional size bounds
pub struct MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    cache: Cache<K, Stamped<V>>,
}

impl<K, V> MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    /// Create a Moka cache from name, optional capacity and optional default TTL
    pub fn new(name: String, max_entries: Option<u64>, default_ttl: Option<Duration>) -> Self {
        let mut builder = Cache::<K, Stamped<V>>::builder()
            .name(&name)
            .expire_after(EntryExpiry { default_ttl });

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<K, V> CacheStore<K, V> for MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    async fn put(&self, key: K, val: V, ttl: Option<TtlMs>) -> Result<PutResponse> {
        let stamped = Stamped {
            value: val,
            ttl: ttl.map(|t| t.as_duration()),
        };
        self.cache.insert(key, stamped).await;
        Ok(PutResponse::new(true, "Successfully inserted"))
    }

    async fn get(&self, key: &K) -> Result<GetResponse<V>> {
        match self.cache.get(key).await {
            Some(stamped) => Ok(GetResponse::new(true, stamped.value)),
            None => Err(Error::NotFound), // Either doesn't exist or TTL expired
        }
    }

    async fn delete(&self, key: &K) -> Result<DeleteResponse> {
        let existed = self.cache.remove(key).await.is_some();
        Ok(DeleteResponse::new(existed))
    }
}

impl<K, V> Debug for MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}
