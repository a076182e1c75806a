//! Operation and suggestion caches owned by a [`SuggestionEngine`](crate::SuggestionEngine).

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

use indexmap::IndexMap;
use nodedoc_types::{OperationDescriptor, SimilaritySuggestion};

#[derive(Debug, Clone)]
struct OperationCacheEntry {
    fetched_at: Instant,
    operations: Vec<OperationDescriptor>,
}

impl OperationCacheEntry {
    fn is_fresh(&self, time_to_live: Duration) -> bool {
        self.fetched_at.elapsed() < time_to_live
    }
}

/// Normalized operation lists keyed by `"{node}:{resource|all}"`, expiring after a TTL.
#[derive(Debug)]
pub(crate) struct OperationCache {
    entries: Mutex<HashMap<String, OperationCacheEntry>>,
    time_to_live: Duration,
}

impl OperationCache {
    pub(crate) fn new(time_to_live: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            time_to_live,
        }
    }

    pub(crate) fn key(node_type: &str, resource: Option<&str>) -> String {
        format!("{node_type}:{}", resource.unwrap_or("all"))
    }

    pub(crate) fn lookup_fresh(&self, key: &str) -> Option<Vec<OperationDescriptor>> {
        let entries = lock(&self.entries);
        let entry = entries.get(key)?;
        if entry.is_fresh(self.time_to_live) {
            Some(entry.operations.clone())
        } else {
            None
        }
    }

    pub(crate) fn store(&self, key: String, operations: Vec<OperationDescriptor>) {
        lock(&self.entries).insert(
            key,
            OperationCacheEntry {
                fetched_at: Instant::now(),
                operations,
            },
        );
    }

    /// Drops entries older than the TTL. Returns how many were removed.
    pub(crate) fn evict_expired(&self) -> usize {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(self.time_to_live));
        before - entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub(crate) fn clear(&self) {
        lock(&self.entries).clear();
    }
}

/// Finished suggestion lists keyed by `"{node}:{invalid}:{resource|}"`, in insertion order.
#[derive(Debug)]
pub(crate) struct SuggestionCache {
    entries: Mutex<IndexMap<String, Vec<SimilaritySuggestion>>>,
    high_water: usize,
    retain: usize,
}

impl SuggestionCache {
    pub(crate) fn new(high_water: usize, retain: usize) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            high_water,
            retain: retain.min(high_water),
        }
    }

    pub(crate) fn key(node_type: &str, invalid: &str, resource: Option<&str>) -> String {
        format!("{node_type}:{invalid}:{}", resource.unwrap_or(""))
    }

    pub(crate) fn get(&self, key: &str) -> Option<Vec<SimilaritySuggestion>> {
        lock(&self.entries).get(key).cloned()
    }

    /// Inserts `suggestions` as the most recent entry, replacing any previous value.
    pub(crate) fn insert(&self, key: String, suggestions: Vec<SimilaritySuggestion>) {
        let mut entries = lock(&self.entries);
        entries.shift_remove(&key);
        entries.insert(key, suggestions);
    }

    /// Keeps only the most recent `retain` entries once the cache grows past
    /// its high-water mark. Returns how many were removed.
    pub(crate) fn trim(&self) -> usize {
        let mut entries = lock(&self.entries);
        if entries.len() <= self.high_water {
            return 0;
        }
        let excess = entries.len() - self.retain;
        entries.drain(..excess);
        excess
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub(crate) fn clear(&self) {
        lock(&self.entries).clear();
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> Vec<String> {
        lock(&self.entries).keys().cloned().collect()
    }
}

// Entries are replaced wholesale, so a poisoned lock still guards consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(value: &str) -> SimilaritySuggestion {
        SimilaritySuggestion {
            value: value.to_string(),
            confidence: 0.5,
            reason: "similar operation".to_string(),
            description: None,
            resource: None,
        }
    }

    #[test]
    fn cache_keys_use_placeholders_for_missing_resource() {
        assert_eq!(OperationCache::key("nodes-base.slack", None), "nodes-base.slack:all");
        assert_eq!(OperationCache::key("nodes-base.slack", Some("message")), "nodes-base.slack:message");
        assert_eq!(SuggestionCache::key("nodes-base.slack", "sned", None), "nodes-base.slack:sned:");
        assert_eq!(
            SuggestionCache::key("nodes-base.slack", "sned", Some("message")),
            "nodes-base.slack:sned:message"
        );
    }

    #[test]
    fn operation_cache_serves_fresh_entries_only() {
        let cache = OperationCache::new(Duration::from_secs(300));
        cache.store("node:all".into(), vec![OperationDescriptor::new("send")]);
        assert_eq!(cache.lookup_fresh("node:all"), Some(vec![OperationDescriptor::new("send")]));

        let expired = OperationCache::new(Duration::ZERO);
        expired.store("node:all".into(), vec![OperationDescriptor::new("send")]);
        assert_eq!(expired.lookup_fresh("node:all"), None);
    }

    #[test]
    fn entries_not_served_are_evicted() {
        let cache = OperationCache::new(Duration::ZERO);
        cache.store("node:all".into(), vec![OperationDescriptor::new("send")]);

        assert_eq!(cache.lookup_fresh("node:all"), None);
        assert_eq!(cache.evict_expired(), 1);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn operation_cache_evicts_expired_entries() {
        let cache = OperationCache::new(Duration::from_millis(20));
        cache.store("old:all".into(), Vec::new());
        std::thread::sleep(Duration::from_millis(40));
        cache.store("new:all".into(), Vec::new());

        assert_eq!(cache.evict_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.lookup_fresh("new:all").is_some());
    }

    #[test]
    fn suggestion_cache_trim_keeps_most_recent_entries() {
        let cache = SuggestionCache::new(100, 50);
        for index in 0..110 {
            cache.insert(format!("node:op{index}:"), vec![suggestion("send")]);
        }

        assert_eq!(cache.trim(), 60);
        assert_eq!(cache.len(), 50);
        let expected: Vec<String> = (60..110).map(|index| format!("node:op{index}:")).collect();
        assert_eq!(cache.keys(), expected);
    }

    #[test]
    fn suggestion_cache_trim_is_noop_below_high_water() {
        let cache = SuggestionCache::new(100, 50);
        for index in 0..100 {
            cache.insert(format!("node:op{index}:"), Vec::new());
        }
        assert_eq!(cache.trim(), 0);
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn reinsert_moves_entry_to_most_recent() {
        let cache = SuggestionCache::new(100, 50);
        cache.insert("a".into(), Vec::new());
        cache.insert("b".into(), Vec::new());
        cache.insert("a".into(), vec![suggestion("send")]);
        assert_eq!(cache.keys(), vec!["b".to_string(), "a".to_string()]);
    }
}
