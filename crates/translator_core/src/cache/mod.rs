//! Two-tier cache (§4.6): bounded in-memory LRU in front of a durable
//! key-value store, keyed by the fingerprint derived in [`key`].
//!
//! Shaped after the teacher's `DiskCache`/`CacheStore` split (a trait for
//! the storage backend, a concrete struct wiring it to a policy layer) —
//! here the "backend" is durable storage and the "policy layer" adds the
//! memory tier, TTLs, and the write-confidence gate on top.

pub mod durable;
pub mod key;
pub mod memory;

use crate::result::{Explanation, TranslationOutcome};
use durable::{DurableCache, DurableCacheError};
use memory::MemoryCache;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use std::sync::Arc;

/// Durable writes are only performed when confidence clears this bar
/// (§4.6) — low-confidence LLM/fallback answers don't pollute the
/// 48-hour tier.
pub const DURABLE_WRITE_MIN_CONFIDENCE: f64 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEventType {
    MemoryHit,
    DurableHit,
    Miss,
    Write,
}

/// Cache-event logging is deduplicated: a `(event_type, hash)` pair is
/// only logged once per minute (§4.6).
struct EventLogDedup {
    last_logged: Mutex<HashMap<(CacheEventType, String), Instant>>,
}

const EVENT_LOG_WINDOW: Duration = Duration::from_secs(60);

impl EventLogDedup {
    fn new() -> Self {
        Self { last_logged: Mutex::new(HashMap::new()) }
    }

    /// Returns `true` the first time this `(event, hash)` pair is seen
    /// inside the current one-minute window.
    fn should_log(&self, event: CacheEventType, hash: &str) -> bool {
        let mut seen = self.last_logged.lock().unwrap();
        let key = (event, hash.to_string());
        match seen.get(&key) {
            Some(last) if last.elapsed() < EVENT_LOG_WINDOW => false,
            _ => {
                seen.insert(key, Instant::now());
                true
            }
        }
    }
}

/// The two-tier cache. Cheap to clone — everything inside is `Arc`-backed
/// or already interior-mutable — so it can be held directly in the
/// `Services` bundle and shared across request handlers.
pub struct Cache {
    memory: MemoryCache,
    durable: Arc<dyn DurableCache>,
    events: EventLogDedup,
}

impl Cache {
    pub fn new(durable: Arc<dyn DurableCache>) -> Self {
        Self { memory: MemoryCache::new(), durable, events: EventLogDedup::new() }
    }

    /// Memory tier, then durable tier. A durable hit populates the memory
    /// tier (§4.6) so the next read for the same fingerprint is served
    /// from memory. Durable `hit_count`/`last_hit_at` bookkeeping is
    /// fire-and-forget — callers must not await it on the request path.
    pub async fn get(&self, fingerprint: &str) -> Option<TranslationOutcome> {
        if let Some(outcome) = self.memory.get(fingerprint) {
            if self.events.should_log(CacheEventType::MemoryHit, fingerprint) {
                tracing::debug!(hash = fingerprint, "cache hit (memory)");
            }
            return Some(outcome);
        }

        match self.durable.get(fingerprint).await {
            Ok(Some(row)) => {
                if self.events.should_log(CacheEventType::DurableHit, fingerprint) {
                    tracing::debug!(hash = fingerprint, "cache hit (durable)");
                }
                self.memory.insert(fingerprint.to_string(), row.outcome.clone());
                Some(row.outcome)
            }
            Ok(None) => {
                if self.events.should_log(CacheEventType::Miss, fingerprint) {
                    tracing::debug!(hash = fingerprint, "cache miss");
                }
                None
            }
            Err(DurableCacheError::Backend(reason)) => {
                // §7(d): durable-cache errors are swallowed with a single
                // structured log line, never surfaced to the caller.
                tracing::warn!(hash = fingerprint, reason, "durable cache read failed");
                None
            }
        }
    }

    /// Populate both tiers. The durable write only happens when
    /// confidence clears [`DURABLE_WRITE_MIN_CONFIDENCE`]; the memory
    /// tier is always populated so a within-process repeat of the same
    /// query is still fast.
    pub async fn put(&self, fingerprint: &str, normalized_query: &str, outcome: &TranslationOutcome) {
        self.memory.insert(fingerprint.to_string(), outcome.clone());

        if outcome.explanation.confidence < DURABLE_WRITE_MIN_CONFIDENCE {
            return;
        }

        if self.events.should_log(CacheEventType::Write, fingerprint) {
            tracing::debug!(hash = fingerprint, "cache write (durable)");
        }

        if let Err(DurableCacheError::Backend(reason)) =
            self.durable.upsert(fingerprint, normalized_query, outcome).await
        {
            tracing::warn!(hash = fingerprint, reason, "durable cache write failed");
        }
    }

    /// Fire-and-forget hit-count bump for a durable-tier hit. The
    /// orchestrator calls this without awaiting the result on the
    /// request path (§5 ordering guarantees, §9 fire-and-forget note).
    pub async fn record_durable_hit(&self, fingerprint: &str) {
        if let Err(DurableCacheError::Backend(reason)) = self.durable.record_hit(fingerprint).await {
            tracing::warn!(hash = fingerprint, reason, "durable cache hit-count update failed");
        }
    }
}

/// Convenience constructor bundling a result into the shape the cache
/// stores (§3's `CacheEntry`): the result plus when it was produced.
pub fn outcome_from_parts(scryfall_query: String, explanation: Explanation, show_affiliate: bool) -> TranslationOutcome {
    TranslationOutcome { scryfall_query, explanation, show_affiliate }
}
