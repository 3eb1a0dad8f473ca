//! Bounded LRU cache of reference-collection HTTP responses.
//!
//! Capacity is fixed, so the cache cannot grow for the lifetime of the
//! process; least recently used entries are evicted first and expired
//! entries are dropped on read.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::LazyLock;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::types::CachedHttpResponse;
use crate::constants::cache::HTTP_RESPONSE_CAPACITY;

pub static HTTP_RESPONSE_CACHE: LazyLock<RwLock<LruCache<String, CachedHttpResponse>>> =
    LazyLock::new(|| {
        RwLock::new(LruCache::new(
            NonZeroUsize::new(HTTP_RESPONSE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        ))
    });

/// Caches HTTP response data with TTL
#[instrument(skip(url, data), fields(url = %url))]
pub async fn cache_http_response(url: String, data: String, ttl_seconds: u64) {
    debug!(
        "Caching HTTP response: url={}, data_size={}, ttl={}s",
        url,
        data.len(),
        ttl_seconds
    );

    let mut cache = HTTP_RESPONSE_CACHE.write().await;
    cache.put(url, CachedHttpResponse::new(data, ttl_seconds));
}

/// Retrieves a cached HTTP response if it's not expired
#[instrument(skip(url), fields(url = %url))]
pub async fn get_cached_http_response(url: &str) -> Option<String> {
    let mut cache = HTTP_RESPONSE_CACHE.write().await;

    match cache.get(url) {
        Some(entry) if !entry.is_expired() => {
            debug!(
                "Cache hit for HTTP response: url={}, age={:?}",
                url,
                entry.cached_at.elapsed()
            );
            Some(entry.data.clone())
        }
        Some(entry) => {
            warn!(
                "Removing expired HTTP response cache entry: url={}, age={:?}, ttl={:?}",
                url,
                entry.cached_at.elapsed(),
                entry.ttl()
            );
            cache.pop(url);
            None
        }
        None => {
            debug!("Cache miss for HTTP response: url={}", url);
            None
        }
    }
}

pub async fn get_http_response_cache_size() -> usize {
    HTTP_RESPONSE_CACHE.read().await.len()
}

pub async fn get_http_response_cache_capacity() -> usize {
    HTTP_RESPONSE_CACHE.read().await.cap().get()
}

pub async fn clear_http_response_cache() {
    HTTP_RESPONSE_CACHE.write().await.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_cache_roundtrip() {
        let url = "https://cache-test.example.com/teams?roundtrip".to_string();
        cache_http_response(url.clone(), "[{\"external_id\": 1}]".to_string(), 60).await;
        assert_eq!(
            get_cached_http_response(&url).await.as_deref(),
            Some("[{\"external_id\": 1}]")
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_zero_ttl_entry_expires() {
        let url = "https://cache-test.example.com/players?expired".to_string();
        cache_http_response(url.clone(), "[]".to_string(), 0).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert_eq!(get_cached_http_response(&url).await, None);
    }

    #[tokio::test]
    #[serial]
    async fn test_cache_is_bounded() {
        for i in 0..(HTTP_RESPONSE_CAPACITY * 2) {
            cache_http_response(
                format!("https://cache-test.example.com/bounded/{i}"),
                "[]".to_string(),
                60,
            )
            .await;
        }
        assert!(get_http_response_cache_size().await <= get_http_response_cache_capacity().await);
        assert_eq!(get_http_response_cache_capacity().await, HTTP_RESPONSE_CAPACITY);
    }
}
