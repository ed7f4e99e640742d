pub mod expiring_cache;
pub mod moka_cache;

pub use expiring_cache::ExpiringCache;
pub use moka_cache::MokaCache;

use bulletin::ports::CacheStore;
use shared::config::CacheBackend;
use std::sync::Arc;
use tracing::info;

/// Build the string cache used for published results
pub fn build_cache(backend: CacheBackend, capacity: u64) -> Arc<dyn CacheStore<String, String>> {
    match backend {
        CacheBackend::Moka => {
            info!("Using moka cache (capacity {})", capacity);
            Arc::new(MokaCache::<String, String>::new(
                "bulletin".to_string(),
                Some(capacity),
                None,
            ))
        }
        CacheBackend::Memory => {
            info!("Using in-process expiring cache");
            Arc::new(ExpiringCache::<String, String>::new())
        }
    }
}
