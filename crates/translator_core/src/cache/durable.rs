//! The durable tier (§4.6, §6): a keyed row surviving process restarts,
//! with `hit_count`/`expires_at`/`last_hit_at` bookkeeping.
//!
//! Kept behind a trait — as `CacheStore` is in the teacher's disk-cache
//! module — so an in-memory fake can stand in for tests without a live
//! Postgres instance.

use crate::result::TranslationOutcome;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

pub const DURABLE_TTL: ChronoDuration = ChronoDuration::hours(48);

#[derive(Debug, Clone)]
pub struct DurableCacheRow {
    pub query_hash: String,
    pub normalized_query: String,
    pub outcome: TranslationOutcome,
    pub hit_count: i64,
    pub expires_at: DateTime<Utc>,
    pub last_hit_at: DateTime<Utc>,
}

#[derive(thiserror::Error, Debug)]
pub enum DurableCacheError {
    #[error("durable cache backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, DurableCacheError>;

/// `query_cache` row access, keyed by `query_hash` with upsert semantics
/// (§6, §5 ordering guarantee (c): "the durable cache uses an upsert on
/// `query_hash` to resolve write races").
#[async_trait]
pub trait DurableCache: Send + Sync {
    async fn get(&self, query_hash: &str) -> Result<Option<DurableCacheRow>>;
    async fn upsert(
        &self,
        query_hash: &str,
        normalized_query: &str,
        outcome: &TranslationOutcome,
    ) -> Result<()>;
    /// Increment `hit_count` and bump `last_hit_at` on a read hit. Callers
    /// don't await this (§9: fire-and-forget durable writes).
    async fn record_hit(&self, query_hash: &str) -> Result<()>;
}

/// In-memory stand-in for tests and for running without `SUPABASE_URL`
/// configured.
#[derive(Default)]
pub struct InMemoryDurableCache {
    rows: Mutex<HashMap<String, DurableCacheRow>>,
}

impl InMemoryDurableCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableCache for InMemoryDurableCache {
    async fn get(&self, query_hash: &str) -> Result<Option<DurableCacheRow>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(query_hash).cloned())
    }

    async fn upsert(
        &self,
        query_hash: &str,
        normalized_query: &str,
        outcome: &TranslationOutcome,
    ) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        rows.entry(query_hash.to_string())
            .and_modify(|row| {
                row.outcome = outcome.clone();
                row.expires_at = now + DURABLE_TTL;
            })
            .or_insert_with(|| DurableCacheRow {
                query_hash: query_hash.to_string(),
                normalized_query: normalized_query.to_string(),
                outcome: outcome.clone(),
                hit_count: 0,
                expires_at: now + DURABLE_TTL,
                last_hit_at: now,
            });
        Ok(())
    }

    async fn record_hit(&self, query_hash: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.get_mut(query_hash) {
            row.hit_count += 1;
            row.last_hit_at = Utc::now();
        }
        Ok(())
    }
}

/// Postgres-backed `query_cache` table (§6). Reads do a `SELECT`, then
/// fire-and-forget an `UPDATE` of `hit_count`/`last_hit_at` (§5's "two
/// round-trips" suspension point); writes are a single upsert on
/// `query_hash`.
pub struct PostgresDurableCache {
    pool: sqlx::PgPool,
}

impl PostgresDurableCache {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DurableCache for PostgresDurableCache {
    async fn get(&self, query_hash: &str) -> Result<Option<DurableCacheRow>> {
        let row = sqlx::query_as::<_, RawRow>(
            "SELECT query_hash, normalized_query, scryfall_query, explanation, \
             confidence, show_affiliate, hit_count, expires_at, last_hit_at \
             FROM query_cache WHERE query_hash = $1 AND expires_at > now()",
        )
        .bind(query_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DurableCacheError::Backend(e.to_string()))?;

        row.map(DurableCacheRow::try_from).transpose()
    }

    async fn upsert(
        &self,
        query_hash: &str,
        normalized_query: &str,
        outcome: &TranslationOutcome,
    ) -> Result<()> {
        let explanation_json = serde_json::to_value(&outcome.explanation)
            .map_err(|e| DurableCacheError::Backend(e.to_string()))?;

        sqlx::query(
            "INSERT INTO query_cache \
             (query_hash, normalized_query, scryfall_query, explanation, confidence, \
              show_affiliate, hit_count, expires_at, last_hit_at) \
             VALUES ($1, $2, $3, $4, $5, $6, 0, now() + interval '48 hours', now()) \
             ON CONFLICT (query_hash) DO UPDATE SET \
               normalized_query = EXCLUDED.normalized_query, \
               scryfall_query = EXCLUDED.scryfall_query, \
               explanation = EXCLUDED.explanation, \
               confidence = EXCLUDED.confidence, \
               show_affiliate = EXCLUDED.show_affiliate, \
               expires_at = now() + interval '48 hours'",
        )
        .bind(query_hash)
        .bind(normalized_query)
        .bind(&outcome.scryfall_query)
        .bind(explanation_json)
        .bind(outcome.explanation.confidence)
        .bind(outcome.show_affiliate)
        .execute(&self.pool)
        .await
        .map_err(|e| DurableCacheError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn record_hit(&self, query_hash: &str) -> Result<()> {
        sqlx::query(
            "UPDATE query_cache SET hit_count = hit_count + 1, last_hit_at = now() \
             WHERE query_hash = $1",
        )
        .bind(query_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| DurableCacheError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct RawRow {
    query_hash: String,
    normalized_query: String,
    scryfall_query: String,
    explanation: serde_json::Value,
    confidence: f64,
    show_affiliate: bool,
    hit_count: i64,
    expires_at: DateTime<Utc>,
    last_hit_at: DateTime<Utc>,
}

impl TryFrom<RawRow> for DurableCacheRow {
    type Error = DurableCacheError;

    fn try_from(raw: RawRow) -> Result<Self> {
        let explanation = serde_json::from_value(raw.explanation)
            .map_err(|e| DurableCacheError::Backend(e.to_string()))?;
        Ok(DurableCacheRow {
            query_hash: raw.query_hash,
            normalized_query: raw.normalized_query,
            outcome: TranslationOutcome {
                scryfall_query: raw.scryfall_query,
                explanation,
                show_affiliate: raw.show_affiliate,
            },
            hit_count: raw.hit_count,
            expires_at: raw.expires_at,
            last_hit_at: raw.last_hit_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Explanation;

    fn sample_outcome() -> TranslationOutcome {
        TranslationOutcome {
            scryfall_query: "t:creature c:r".to_string(),
            explanation: Explanation {
                readable: "red creatures".to_string(),
                assumptions: vec![],
                confidence: 0.9,
            },
            show_affiliate: false,
        }
    }

    #[tokio::test]
    async fn in_memory_upsert_then_get_round_trips() {
        let cache = InMemoryDurableCache::new();
        cache.upsert("abc123", "red creatures", &sample_outcome()).await.unwrap();
        let row = cache.get("abc123").await.unwrap().unwrap();
        assert_eq!(row.outcome.scryfall_query, "t:creature c:r");
        assert_eq!(row.hit_count, 0);
    }

    #[tokio::test]
    async fn record_hit_increments_hit_count() {
        let cache = InMemoryDurableCache::new();
        cache.upsert("abc123", "red creatures", &sample_outcome()).await.unwrap();
        cache.record_hit("abc123").await.unwrap();
        cache.record_hit("abc123").await.unwrap();
        let row = cache.get("abc123").await.unwrap().unwrap();
        assert_eq!(row.hit_count, 2);
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let cache = InMemoryDurableCache::new();
        assert!(cache.get("missing").await.unwrap().is_none());
    }
}
