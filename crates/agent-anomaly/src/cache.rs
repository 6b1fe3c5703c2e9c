//! Caching layer for fetched histories

use crate::period::Period;
use crate::series::LabeledHistory;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for a history request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Upper-cased ticker
    pub ticker: String,
    /// Cutoff period of the request
    pub cutoff: Period,
}

impl CacheKey {
    pub fn new(ticker: &str, cutoff: Period) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            cutoff,
        }
    }
}

/// Thread-safe TTL cache of fetched histories
#[derive(Clone)]
pub struct HistoryCache {
    cache: Arc<RwLock<TimedCache<CacheKey, LabeledHistory>>>,
}

impl HistoryCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a history from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<LabeledHistory> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a history into the cache
    pub async fn insert(&self, key: CacheKey, history: LabeledHistory) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, history);
    }

    /// Get or fetch a history using the provided fetcher
    ///
    /// Errors from the fetcher are returned as-is and nothing is cached. Empty
    /// histories are returned but not cached, so a ticker ingested later is seen on
    /// the next request.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetcher: F) -> Result<LabeledHistory, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<LabeledHistory, E>>,
    {
        if let Some(history) = self.get(&key).await {
            tracing::debug!(ticker = %key.ticker, cutoff = %key.cutoff, "History cache hit");
            return Ok(history);
        }

        tracing::debug!(ticker = %key.ticker, cutoff = %key.cutoff, "History cache miss");

        let history = fetcher().await?;
        if !history.is_empty() {
            self.insert(key, history.clone()).await;
        }

        Ok(history)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::MetricSnapshot;

    fn sample_history() -> LabeledHistory {
        LabeledHistory::from([(
            "Q1 2024".to_string(),
            MetricSnapshot::from([("revenue".to_string(), 100.0)]),
        )])
    }

    fn cutoff() -> Period {
        Period::parse("Q2 2024").unwrap()
    }

    #[test]
    fn test_cache_key_normalizes_ticker() {
        assert_eq!(CacheKey::new("aapl", cutoff()), CacheKey::new("AAPL", cutoff()));
        assert_ne!(
            CacheKey::new("AAPL", cutoff()),
            CacheKey::new("AAPL", Period::parse("Q3 2024").unwrap())
        );
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", cutoff());

        cache.insert(key.clone(), sample_history()).await;
        assert_eq!(cache.get(&key).await, Some(sample_history()));
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", cutoff());

        let mut call_count = 0;
        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(sample_history()) }
            })
            .await
            .unwrap();
        assert_eq!(result, sample_history());
        assert_eq!(call_count, 1);

        let result = cache
            .get_or_fetch(key, || {
                call_count += 1;
                async { Ok::<_, String>(LabeledHistory::new()) }
            })
            .await
            .unwrap();
        assert_eq!(result, sample_history());
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_fetch_error_not_cached() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", cutoff());

        let result = cache
            .get_or_fetch(key.clone(), || async { Err::<LabeledHistory, _>("down".to_string()) })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_history_not_cached() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", cutoff());

        let result = cache
            .get_or_fetch(key.clone(), || async { Ok::<_, String>(LabeledHistory::new()) })
            .await
            .unwrap();
        assert!(result.is_empty());
        assert!(cache.is_empty().await);

        let result = cache
            .get_or_fetch(key, || async { Ok::<_, String>(sample_history()) })
            .await
            .unwrap();
        assert_eq!(result, sample_history());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cache_invalidation_and_clear() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", cutoff());

        cache.insert(key.clone(), sample_history()).await;
        cache.invalidate(&key).await;
        assert!(cache.get(&key).await.is_none());

        for ticker in ["AAPL", "MSFT", "NVDA"] {
            cache.insert(CacheKey::new(ticker, cutoff()), sample_history()).await;
        }
        assert_eq!(cache.len().await, 3);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
