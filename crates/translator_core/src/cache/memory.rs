//! In-memory LRU tier (§4.6): bounded at 1000 entries, 30-minute TTL,
//! touched (moved to most-recently-used) on read, with a lazy expiry
//! sweep every ~50 accesses.
//!
//! Per §9's design note rejecting "delete and reinsert relying on
//! insertion-order iteration", this is an explicit ordered index
//! (`IndexMap`, shift-to-back on touch) rather than relying on a plain
//! `HashMap`'s unspecified iteration order.

use crate::result::TranslationOutcome;
use indexmap::IndexMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const MEMORY_TTL: Duration = Duration::from_secs(30 * 60);
pub const MEMORY_CAPACITY: usize = 1000;
const SWEEP_INTERVAL: u64 = 50;

#[derive(Debug, Clone)]
pub struct MemoryCacheEntry {
    pub outcome: TranslationOutcome,
    pub inserted_at: Instant,
}

impl MemoryCacheEntry {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > MEMORY_TTL
    }
}

struct Inner {
    entries: IndexMap<String, MemoryCacheEntry>,
    accesses: u64,
}

/// The bounded LRU memory tier. Cheap to clone (wraps a `Mutex`-guarded
/// index), safe to share across request handlers via `Arc`.
pub struct MemoryCache {
    inner: Mutex<Inner>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner { entries: IndexMap::new(), accesses: 0 }),
        }
    }

    /// Read a value, touching it (moving it to the back, i.e.
    /// most-recently-used) on a live hit. Expired entries are treated as
    /// a miss and removed immediately rather than waiting for the lazy
    /// sweep.
    pub fn get(&self, key: &str) -> Option<TranslationOutcome> {
        let mut inner = self.inner.lock().unwrap();
        inner.accesses += 1;
        let do_sweep = inner.accesses % SWEEP_INTERVAL == 0;

        let hit = match inner.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                inner.entries.shift_remove(key);
                None
            }
            Some(entry) => Some(entry.outcome.clone()),
            None => None,
        };

        if hit.is_some() {
            // Move-to-end == most-recently-used for our eviction order
            // (we evict from the front).
            inner.entries.shift_remove(key).map(|entry| {
                inner.entries.insert(key.to_string(), entry);
            });
        }

        if do_sweep {
            sweep_expired(&mut inner.entries);
        }

        hit
    }

    /// Insert/overwrite a value, evicting the least-recently-touched
    /// entry if the cache is at capacity.
    pub fn insert(&self, key: String, outcome: TranslationOutcome) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.shift_remove(&key);
        if inner.entries.len() >= MEMORY_CAPACITY {
            inner.entries.shift_remove_index(0);
        }
        inner.entries.insert(key, MemoryCacheEntry { outcome, inserted_at: Instant::now() });
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sweep_expired(entries: &mut IndexMap<String, MemoryCacheEntry>) {
    let expired: Vec<String> = entries
        .iter()
        .filter(|(_, v)| v.is_expired())
        .map(|(k, _)| k.clone())
        .collect();
    for key in expired {
        entries.shift_remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Explanation;

    fn outcome(query: &str) -> TranslationOutcome {
        TranslationOutcome {
            scryfall_query: query.to_string(),
            explanation: Explanation { readable: query.to_string(), assumptions: vec![], confidence: 0.9 },
            show_affiliate: false,
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let cache = MemoryCache::new();
        cache.insert("k1".into(), outcome("t:creature"));
        assert_eq!(cache.get("k1").unwrap().scryfall_query, "t:creature");
    }

    #[test]
    fn miss_on_unknown_key() {
        let cache = MemoryCache::new();
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn eviction_drops_least_recently_touched_entry() {
        let cache = MemoryCache::new();
        for i in 0..MEMORY_CAPACITY {
            cache.insert(format!("k{i}"), outcome("q"));
        }
        // Touch k1 so it's no longer the least-recently-used entry.
        cache.get("k1");
        cache.insert("overflow".into(), outcome("q"));
        assert!(cache.get("k0").is_none(), "k0 should have been evicted");
        assert!(cache.get("k1").is_some(), "k1 was touched, should survive");
        assert_eq!(cache.len(), MEMORY_CAPACITY);
    }

    #[test]
    fn reinserting_an_existing_key_does_not_grow_the_cache() {
        let cache = MemoryCache::new();
        cache.insert("k1".into(), outcome("a"));
        cache.insert("k1".into(), outcome("b"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k1").unwrap().scryfall_query, "b");
    }
}
