use crate::storage::Article;
use crate::store::Filter;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Accumulated feed state worth restoring when a filter is revisited.
///
/// `articles` is an `Arc` so caching and restoring never copy the list.
#[derive(Debug, Clone)]
pub struct CachedFeed {
    pub articles: Arc<Vec<Article>>,
    pub pages_loaded: u32,
    pub next_page: Option<u32>,
}

/// Bounded, time-limited memo of feeds keyed by filter.
pub struct FeedCache {
    entries: LruCache<Filter, (CachedFeed, Instant)>,
    ttl: Duration,
}

impl FeedCache {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Fresh entry for `filter`, if any. Expired entries are evicted.
    pub fn get(&mut self, filter: &Filter, now: Instant) -> Option<CachedFeed> {
        let expired = match self.entries.get(filter) {
            Some((feed, stored_at)) if now.saturating_duration_since(*stored_at) < self.ttl => {
                return Some(feed.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.pop(filter);
            tracing::debug!(filter = %filter, "Feed cache entry expired");
        }
        None
    }

    pub fn put(&mut self, filter: Filter, feed: CachedFeed, now: Instant) {
        self.entries.put(filter, (feed, now));
    }

    pub fn invalidate(&mut self, filter: &Filter) {
        self.entries.pop(filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Category;

    fn feed(pages: u32) -> CachedFeed {
        CachedFeed {
            articles: Arc::new(Vec::new()),
            pages_loaded: pages,
            next_page: Some(pages + 1),
        }
    }

    fn cache(capacity: usize, ttl_secs: u64) -> FeedCache {
        FeedCache::new(
            NonZeroUsize::new(capacity).unwrap(),
            Duration::from_secs(ttl_secs),
        )
    }

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = cache(4, 300);
        let now = Instant::now();
        let filter = Filter::Category(Category::Sports);
        cache.put(filter.clone(), feed(2), now);

        let hit = cache.get(&filter, now + Duration::from_secs(299)).unwrap();
        assert_eq!(hit.pages_loaded, 2);
    }

    #[test]
    fn test_miss_after_ttl() {
        let mut cache = cache(4, 300);
        let now = Instant::now();
        let filter = Filter::Category(Category::Sports);
        cache.put(filter.clone(), feed(1), now);

        assert!(cache.get(&filter, now + Duration::from_secs(300)).is_none());
        // Evicted, so even an earlier clock misses now
        assert!(cache.get(&filter, now).is_none());
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let mut cache = cache(2, 300);
        let now = Instant::now();
        let a = Filter::Category(Category::Business);
        let b = Filter::Category(Category::Health);
        let c = Filter::Search("rust".to_string());

        cache.put(a.clone(), feed(1), now);
        cache.put(b.clone(), feed(1), now);
        cache.get(&a, now);
        cache.put(c.clone(), feed(1), now);

        assert!(cache.get(&a, now).is_some());
        assert!(cache.get(&b, now).is_none());
        assert!(cache.get(&c, now).is_some());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = cache(4, 300);
        let now = Instant::now();
        let filter = Filter::Search("mars".to_string());
        cache.put(filter.clone(), feed(1), now);
        cache.invalidate(&filter);
        assert!(cache.get(&filter, now).is_none());
    }
}
