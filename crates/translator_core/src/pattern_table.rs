//! Pattern-match table (C7): an exact-normalized-query lookup against a
//! rule table loaded from durable storage, plus a small hard-coded set of
//! critical rules, bypassing both the deterministic parser and the LLM.

use std::collections::HashMap;
use std::sync::RwLock;

/// Rules loaded from storage must clear this confidence bar to be
/// considered (§4.7, §9: independently tunable from
/// [`crate::orchestrator::AI_SEED_MIN_CONFIDENCE`]).
pub const PATTERN_TABLE_MIN_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: String,
    pub scryfall_syntax: String,
    pub confidence: f64,
    pub description: String,
    pub is_active: bool,
}

/// `translation_rules` row access (§6), filtered to `is_active AND
/// confidence >= PATTERN_TABLE_MIN_CONFIDENCE` at load time.
#[async_trait::async_trait]
pub trait RuleStore: Send + Sync {
    async fn load_active_rules(&self) -> Vec<Rule>;
}

/// In-memory stand-in for tests and for running without `SUPABASE_URL`
/// configured — yields no dynamic rules, leaving only the hard-coded set.
pub struct EmptyRuleStore;

#[async_trait::async_trait]
impl RuleStore for EmptyRuleStore {
    async fn load_active_rules(&self) -> Vec<Rule> {
        Vec::new()
    }
}

pub struct PostgresRuleStore {
    pool: sqlx::PgPool,
}

impl PostgresRuleStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RuleStore for PostgresRuleStore {
    async fn load_active_rules(&self) -> Vec<Rule> {
        let rows = sqlx::query_as::<_, RawRule>(
            "SELECT pattern, scryfall_syntax, confidence, description, is_active \
             FROM translation_rules WHERE is_active = true AND confidence >= $1",
        )
        .bind(PATTERN_TABLE_MIN_CONFIDENCE)
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows.into_iter().map(Rule::from).collect(),
            Err(err) => {
                // §7(d): swallowed with a single structured log line.
                tracing::warn!(error = %err, "failed to load translation rules, using hard-coded set only");
                Vec::new()
            }
        }
    }
}

#[derive(sqlx::FromRow)]
struct RawRule {
    pattern: String,
    scryfall_syntax: String,
    confidence: f64,
    description: String,
    is_active: bool,
}

impl From<RawRule> for Rule {
    fn from(raw: RawRule) -> Self {
        Rule {
            pattern: raw.pattern,
            scryfall_syntax: raw.scryfall_syntax,
            confidence: raw.confidence,
            description: raw.description,
            is_active: raw.is_active,
        }
    }
}

fn hardcoded_rules() -> Vec<Rule> {
    vec![
        Rule {
            pattern: "mana rocks".to_string(),
            scryfall_syntax: "otag:manarock".to_string(),
            confidence: 0.95,
            description: "Cheap colorless-mana artifacts".to_string(),
            is_active: true,
        },
        Rule {
            pattern: "board wipes".to_string(),
            scryfall_syntax: "otag:wrath".to_string(),
            confidence: 0.95,
            description: "Mass creature removal".to_string(),
            is_active: true,
        },
        Rule {
            pattern: "one sided board wipes".to_string(),
            scryfall_syntax: "o:\"destroy all creatures you don't control\"".to_string(),
            confidence: 0.9,
            description: "Asymmetric board wipes".to_string(),
            is_active: true,
        },
    ]
}

/// Lowercase, trim, collapse whitespace, strip punctuation, split on
/// whitespace, sort alphabetically, rejoin — makes the match
/// order-independent (§4.7, §8's `pattern("red creatures cheap") ==
/// pattern("cheap red creatures")` property).
pub fn normalize_for_pattern(query: &str) -> String {
    let stripped: String = query
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();
    let mut words: Vec<String> = stripped
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();
    words.sort();
    words.join(" ")
}

pub struct PatternTable {
    rules_by_normalized_pattern: RwLock<HashMap<String, Rule>>,
}

impl PatternTable {
    /// Load the dynamic rule set from `store` (filtered upstream) and
    /// layer the hard-coded critical rules on top, indexed by their
    /// order-independent normalized pattern.
    pub async fn load(store: &dyn RuleStore) -> Self {
        let mut index = HashMap::new();
        for rule in hardcoded_rules().into_iter().chain(store.load_active_rules().await) {
            index.insert(normalize_for_pattern(&rule.pattern), rule);
        }
        Self { rules_by_normalized_pattern: RwLock::new(index) }
    }

    pub fn lookup(&self, query: &str) -> Option<Rule> {
        let normalized = normalize_for_pattern(query);
        self.rules_by_normalized_pattern.read().unwrap().get(&normalized).cloned()
    }

    /// Seed a new rule discovered via a high-confidence AI response
    /// (§4.10 step 8: "optionally auto-seed a new rule in the pattern
    /// table when confidence >= 0.8"). In-process only; a durable-backed
    /// `RuleStore` would additionally persist this.
    pub fn seed(&self, rule: Rule) {
        self.rules_by_normalized_pattern
            .write()
            .unwrap()
            .insert(normalize_for_pattern(&rule.pattern), rule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_order_independent() {
        assert_eq!(
            normalize_for_pattern("red creatures cheap"),
            normalize_for_pattern("cheap red creatures"),
        );
    }

    #[test]
    fn punctuation_is_stripped_before_sorting() {
        assert_eq!(normalize_for_pattern("red, creatures!"), normalize_for_pattern("creatures red"));
    }

    #[tokio::test]
    async fn hardcoded_rules_are_available_without_a_store() {
        let table = PatternTable::load(&EmptyRuleStore).await;
        let hit = table.lookup("mana rocks").unwrap();
        assert_eq!(hit.scryfall_syntax, "otag:manarock");
    }

    #[tokio::test]
    async fn lookup_is_word_order_independent() {
        let table = PatternTable::load(&EmptyRuleStore).await;
        assert!(table.lookup("board wipes").is_some());
        assert!(table.lookup("wipes board").is_some());
    }

    #[tokio::test]
    async fn seeded_rule_becomes_lookupable() {
        let table = PatternTable::load(&EmptyRuleStore).await;
        assert!(table.lookup("grindy value engines").is_none());
        table.seed(Rule {
            pattern: "grindy value engines".to_string(),
            scryfall_syntax: "otag:value".to_string(),
            confidence: 0.85,
            description: "AI-seeded".to_string(),
            is_active: true,
        });
        assert!(table.lookup("value grindy engines").is_some());
    }
}
