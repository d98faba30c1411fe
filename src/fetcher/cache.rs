//! Bounded store of previous responses, used to make requests conditional.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use reqwest::header::HeaderValue;

/// A cached response together with the validator that identifies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    /// Entity tag returned alongside `body`, kept as raw header bytes
    pub etag: HeaderValue,
    pub body: Vec<u8>,
}

impl CacheEntry {
    pub fn new(etag: HeaderValue, body: Vec<u8>) -> Self {
        CacheEntry { etag, body }
    }
}

/// Response cache keyed by full request URL, with LRU eviction.
///
/// Capacity counts entries, not bytes. A capacity of zero disables
/// caching: lookups always miss and inserts are dropped.
pub struct ResponseCache {
    entries: Option<Mutex<LruCache<String, CacheEntry>>>,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        ResponseCache {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.entries
            .as_ref()
            .map_or(0, |entries| entries.lock().cap().get())
    }

    /// Look up an entry, marking it as most recently used.
    pub fn get(&self, url: &str) -> Option<CacheEntry> {
        self.entries.as_ref()?.lock().get(url).cloned()
    }

    /// Look up an entry without touching its recency.
    pub fn peek(&self, url: &str) -> Option<CacheEntry> {
        self.entries.as_ref()?.lock().peek(url).cloned()
    }

    /// Store or replace the entry for `url`.
    pub fn put(&self, url: String, entry: CacheEntry) {
        let Some(entries) = &self.entries else {
            return;
        };

        let mut entries = entries.lock();
        if let Some((evicted, _)) = entries.push(url.clone(), entry) {
            if evicted != url {
                tracing::debug!("Evicted cached response for {}", evicted);
            }
        }
    }

    pub fn remove(&self, url: &str) {
        if let Some(entries) = &self.entries {
            entries.lock().pop(url);
        }
    }

    #[cfg(test)]
    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(etag: &'static str, body: &str) -> CacheEntry {
        CacheEntry::new(HeaderValue::from_static(etag), body.as_bytes().to_vec())
    }

    #[test]
    fn test_put_and_get() {
        let cache = ResponseCache::new(2);
        cache.put("http://a/1".into(), entry("v1", "one"));

        assert_eq!(cache.get("http://a/1"), Some(entry("v1", "one")));
        assert_eq!(cache.get("http://a/2"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_replace_keeps_one_entry_per_url() {
        let cache = ResponseCache::new(2);
        cache.put("http://a/1".into(), entry("v1", "one"));
        cache.put("http://a/1".into(), entry("v2", "uno"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.peek("http://a/1"), Some(entry("v2", "uno")));
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = ResponseCache::new(2);
        cache.put("http://a/1".into(), entry("v1", "one"));
        cache.put("http://a/2".into(), entry("v2", "two"));

        // Touch the first so the second becomes the eviction candidate.
        assert!(cache.get("http://a/1").is_some());
        cache.put("http://a/3".into(), entry("v3", "three"));

        assert_eq!(cache.len(), 2);
        assert!(cache.peek("http://a/1").is_some());
        assert!(cache.peek("http://a/2").is_none());
        assert!(cache.peek("http://a/3").is_some());
    }

    #[test]
    fn test_capacity_counts_entries_not_bytes() {
        let cache = ResponseCache::new(3);
        let big = CacheEntry::new(HeaderValue::from_static("v"), vec![0u8; 1 << 20]);
        cache.put("http://a/big".into(), big);
        cache.put("http://a/small".into(), entry("v", "x"));

        assert_eq!(cache.capacity(), 3);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = ResponseCache::new(0);
        cache.put("http://a/1".into(), entry("v1", "one"));

        assert!(!cache.is_enabled());
        assert_eq!(cache.capacity(), 0);
        assert!(cache.get("http://a/1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = ResponseCache::new(4);
        cache.put("http://a/1".into(), entry("v1", "one"));
        cache.put("http://a/2".into(), entry("v2", "two"));

        cache.remove("http://a/1");
        assert!(cache.peek("http://a/1").is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
