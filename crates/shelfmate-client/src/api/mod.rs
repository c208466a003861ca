//! Typed wrappers over the domain endpoints. Every call returns a tagged
//! [`Failure`] on error.

mod catalog;
mod commerce;
mod profile;
mod sessions;
mod social;

pub use catalog::{BooksApi, BookstoresApi, NearbyBookstore};
pub use commerce::{ShopApi, SubscriptionsApi};
pub use profile::ProfileApi;
pub use sessions::SessionsApi;
pub use social::{FeedApi, QuotesApi, ReviewsApi};

use serde::de::DeserializeOwned;
use serde::Serialize;
use shelfmate_types::Failure;
use std::future::Future;
use std::time::Duration;

use crate::storage::KeyValueStore;

/// Default page size for list endpoints.
pub(crate) const PER_PAGE: u32 = 20;

pub(crate) fn page_query(page: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.max(1).to_string()), ("per_page", PER_PAGE.to_string())]
}

/// Serve `key` from the cache when fresh, otherwise fetch and cache it.
/// A zero TTL bypasses the cache. Cache write failures are logged only.
pub(crate) async fn cached<T, F, Fut>(
    cache: &KeyValueStore,
    key: &str,
    ttl_secs: u64,
    fetch: F,
) -> Result<T, Failure>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    if ttl_secs == 0 {
        return fetch().await;
    }
    if let Some(hit) = cache.get_cached(key).await {
        tracing::debug!("Cache hit for {}", key);
        return Ok(hit);
    }

    let value = fetch().await?;
    if let Err(e) = cache.put_cached(key, &value, Duration::from_secs(ttl_secs)).await {
        tracing::warn!("Failed to cache {}: {}", key, e);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_cached_fetches_once() {
        let cache = KeyValueStore::in_memory();
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let fetch = || async move {
            let _ = calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Failure>(vec![1_u32, 2, 3])
        };

        let first = cached(&cache, "k", 60, fetch).await.ok();
        let second = cached(&cache, "k", 60, fetch).await.ok();
        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_bypasses_cache() {
        let cache = KeyValueStore::in_memory();
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let fetch = || async move {
            let _ = calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Failure>(7_u32)
        };

        let _ = cached(&cache, "k", 0, fetch).await;
        let _ = cached(&cache, "k", 0, fetch).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_page_query_clamps_to_first_page() {
        assert_eq!(page_query(0)[0], ("page", "1".to_string()));
    }
}
