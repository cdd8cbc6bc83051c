//! Orchestrator (C10): the end-to-end request handler composing every
//! other component per the precedence chain in §4.10.

use crate::cache::Cache;
use crate::circuit_breaker::CircuitBreaker;
use crate::config::Config;
use crate::llm::{looks_non_english, LlmClient, Model, PromptTier};
use crate::parser::{self, ParseOutcome};
use crate::pattern_table::PatternTable;
use crate::renderer::render;
use crate::result::{Explanation, Source, TranslationOutcome, TranslationResponse};
use crate::task_queue::TaskQueue;
use crate::validator::validate;
use std::sync::Arc;
use std::time::Instant;

/// An AI-seeded pattern-table rule requires at least this confidence
/// (§4.10 step 8). Distinct from and independently tunable against
/// [`crate::cache::DURABLE_WRITE_MIN_CONFIDENCE`] and
/// [`crate::pattern_table::PATTERN_TABLE_MIN_CONFIDENCE`] (§9).
pub const AI_SEED_MIN_CONFIDENCE: f64 = 0.8;

const DETERMINISTIC_CONFIDENCE: f64 = 0.9;
const FALLBACK_CONFIDENCE_FLOOR: f64 = 0.5;
const FALLBACK_CONFIDENCE_CEIL: f64 = 0.6;
const RAW_SYNTAX_OPERATOR_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub format: Option<String>,
    pub color_identity: Option<Vec<String>>,
    pub max_cmc: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct DebugOptions {
    pub force_fallback: bool,
    pub simulate_ai_failure: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TranslateRequest {
    pub query: String,
    pub filters: Filters,
    pub use_cache: bool,
    pub cache_salt: Option<String>,
    pub debug: DebugOptions,
}

/// Process-wide shared state (§5): the cache, circuit breaker, pattern
/// table, and background task queue, constructed once in `main` and
/// handed to the orchestrator behind an `Arc`.
pub struct Services {
    pub cache: Cache,
    pub breaker: CircuitBreaker,
    pub patterns: PatternTable,
    pub llm: Option<LlmClient>,
    pub config: Config,
    pub tasks: TaskQueue,
}

pub async fn translate(services: &Arc<Services>, request: TranslateRequest) -> TranslationResponse {
    let started = Instant::now();
    let original_query = request.query.clone();

    if let Some(rejection) = reject_malformed(&request.query) {
        return rejection_response(original_query, rejection, started);
    }

    let sanitized_query = strip_duplicate_tokens(&request.query);

    // Step 2: debug force-fallback.
    if request.debug.force_fallback {
        let outcome = fallback_builder(&sanitized_query, &request.filters);
        return finish(services, &request, original_query, outcome, Source::Fallback, started, None).await;
    }

    let fingerprint = crate::cache::key::fingerprint(
        &sanitized_query,
        &filters_json(&request.filters),
        request.cache_salt.as_deref().unwrap_or(""),
    );

    // Step 3: cache lookups.
    if request.use_cache {
        if let Some(outcome) = services.cache.get(&fingerprint).await {
            // Hit-count bookkeeping is genuinely fire-and-forget (§5's
            // suspension-point list, §9's redesign note): it never feeds
            // back into this or any other response, so it goes through
            // the bounded background queue rather than being awaited on
            // the request path.
            let background_services = services.clone();
            let background_fingerprint = fingerprint.clone();
            services.tasks.submit(async move {
                background_services.cache.record_durable_hit(&background_fingerprint).await;
            });
            return finish_cached(original_query, outcome, started);
        }
    }

    // Step 4: pattern-match table.
    if let Some(rule) = services.patterns.lookup(&sanitized_query) {
        let outcome = TranslationOutcome {
            scryfall_query: rule.scryfall_syntax.clone(),
            explanation: Explanation {
                readable: rule.description.clone(),
                assumptions: vec!["matched a known pattern".to_string()],
                confidence: rule.confidence,
            },
            show_affiliate: false,
        };
        return finish(services, &request, original_query, outcome, Source::PatternMatch, started, Some(fingerprint)).await;
    }

    // Step 5: circuit / API-key gate.
    if !services.breaker.allow_request() || !services.config.has_llm_key() {
        let outcome = fallback_builder(&sanitized_query, &request.filters);
        return finish(services, &request, original_query, outcome, Source::Fallback, started, Some(fingerprint)).await;
    }

    // Step 6: raw-syntax detector.
    if looks_like_raw_syntax(&sanitized_query) {
        let validated = validate(&sanitized_query);
        let outcome = TranslationOutcome {
            scryfall_query: validated.sanitized,
            explanation: Explanation {
                readable: "passed through as raw Scryfall syntax".to_string(),
                assumptions: validated.issues.clone(),
                confidence: 0.95,
            },
            show_affiliate: false,
        };
        let mut response = finish(services, &request, original_query, outcome, Source::RawSyntax, started, Some(fingerprint)).await;
        if !validated.issues.is_empty() {
            response.validation_issues = Some(validated.issues);
        }
        return response;
    }

    // Step 7: deterministic attempt.
    match parser::build_ir(&sanitized_query) {
        ParseOutcome::ShortCircuit(query) => {
            let validated = validate(&query);
            let outcome = TranslationOutcome {
                scryfall_query: validated.sanitized,
                explanation: Explanation {
                    readable: "matched a known card name".to_string(),
                    assumptions: vec![],
                    confidence: 0.95,
                },
                show_affiliate: false,
            };
            finish(services, &request, original_query, outcome, Source::CardName, started, Some(fingerprint)).await
        }
        ParseOutcome::Ir(built) => {
            if built.remaining.trim().is_empty() {
                let rendered = apply_filters(render(&built.ir), &request.filters);
                let validated = validate(&rendered);
                let outcome = TranslationOutcome {
                    scryfall_query: validated.sanitized,
                    explanation: Explanation {
                        readable: "parsed deterministically".to_string(),
                        assumptions: validated.issues.clone(),
                        confidence: DETERMINISTIC_CONFIDENCE,
                    },
                    show_affiliate: false,
                };
                let mut response = finish(services, &request, original_query, outcome, Source::Deterministic, started, Some(fingerprint)).await;
                if !validated.issues.is_empty() {
                    response.validation_issues = Some(validated.issues);
                }
                response
            } else {
                // Step 8: LLM path.
                let llm_result = if request.debug.simulate_ai_failure {
                    Err(crate::error::TranslatorError::AiCallFailed("simulated failure".to_string()))
                } else {
                    run_llm_path(services, &built.ir, &built.remaining, &sanitized_query, &request.filters).await
                };
                match llm_result {
                    Ok(outcome) => {
                        services.breaker.record_success();
                        if outcome.explanation.confidence >= AI_SEED_MIN_CONFIDENCE {
                            services.patterns.seed(crate::pattern_table::Rule {
                                pattern: sanitized_query.clone(),
                                scryfall_syntax: outcome.scryfall_query.clone(),
                                confidence: outcome.explanation.confidence,
                                description: "AI-seeded".to_string(),
                                is_active: true,
                            });
                        }
                        finish(services, &request, original_query, outcome, Source::Ai, started, Some(fingerprint)).await
                    }
                    Err(_) => {
                        // Step 9: LLM failure.
                        services.breaker.record_failure();
                        let outcome = fallback_builder(&sanitized_query, &request.filters);
                        finish(services, &request, original_query, outcome, Source::AiFailureFallback, started, Some(fingerprint)).await
                    }
                }
            }
        }
    }
}

async fn run_llm_path(
    services: &Arc<Services>,
    ir: &crate::ir::SearchIr,
    remaining: &str,
    full_query: &str,
    filters: &Filters,
) -> crate::error::Result<TranslationOutcome> {
    let llm = services.llm.as_ref().ok_or(crate::error::TranslatorError::AiUnavailable)?;

    let is_non_english = looks_non_english(full_query);
    let translation_input = if is_non_english {
        llm.translate_to_english(full_query).await?
    } else {
        full_query.to_string()
    };

    let tier = PromptTier::for_query(&translation_input);
    let looks_like_card_name = remaining.split_whitespace().count() <= 3 && ir.types.is_empty();
    let model = Model::select(looks_like_card_name, is_non_english);

    let translation = llm.translate(&translation_input, tier, model, &[]).await?;

    let rendered = apply_filters(translation.scryfall_query, filters);
    let validated = validate(&rendered);
    let mut assumptions = vec![translation.explanation.clone()];
    assumptions.extend(validated.issues.iter().cloned());

    Ok(TranslationOutcome {
        scryfall_query: validated.sanitized,
        explanation: Explanation {
            readable: translation.explanation,
            assumptions,
            confidence: translation.confidence,
        },
        show_affiliate: true,
    })
}

/// The degraded path: deterministic parser output plus a static
/// regex/table substitution pass, applied filters, sanitised, confidence
/// pinned to the 0.5-0.6 band (§4.10.1).
fn fallback_builder(query: &str, filters: &Filters) -> TranslationOutcome {
    let (base, residual_hit) = match parser::build_ir(query) {
        ParseOutcome::ShortCircuit(q) => (q, false),
        ParseOutcome::Ir(built) => (render(&built.ir), !built.remaining.trim().is_empty()),
    };

    let rendered = apply_filters(base, filters);
    let validated = validate(&rendered);
    let confidence = if residual_hit { FALLBACK_CONFIDENCE_FLOOR } else { FALLBACK_CONFIDENCE_CEIL };

    TranslationOutcome {
        scryfall_query: validated.sanitized,
        explanation: Explanation {
            readable: "best-effort translation (AI unavailable)".to_string(),
            assumptions: validated.issues,
            confidence,
        },
        show_affiliate: false,
    }
}

fn apply_filters(query: String, filters: &Filters) -> String {
    let mut tokens = vec![query];
    if let Some(format) = &filters.format {
        tokens.push(format!("f:{format}"));
    }
    if let Some(identity) = &filters.color_identity {
        if !identity.is_empty() {
            tokens.push(format!("id<={}", identity.join("")));
        }
    }
    if let Some(max_cmc) = filters.max_cmc {
        tokens.push(format!("mv<={max_cmc}"));
    }
    tokens.into_iter().filter(|t| !t.is_empty()).collect::<Vec<_>>().join(" ")
}

fn filters_json(filters: &Filters) -> String {
    serde_json::json!({
        "format": filters.format,
        "colorIdentity": filters.color_identity,
        "maxCmc": filters.max_cmc,
    })
    .to_string()
}

enum Rejection {
    TooShort,
    TooManyOperators,
    RepeatedEmptyOperators,
    MostlyNonAlphanumeric,
    ExcessiveCharacterRepetition,
}

/// Step 1: input sanitisation rejections (§4.10).
fn reject_malformed(query: &str) -> Option<Rejection> {
    if query.trim().len() < 3 {
        return Some(Rejection::TooShort);
    }

    let operator_like_count = query.split_whitespace().filter(|t| t.contains(':')).count();
    if operator_like_count > 15 {
        return Some(Rejection::TooManyOperators);
    }

    if has_repeated_empty_operators(query) {
        return Some(Rejection::RepeatedEmptyOperators);
    }

    let non_alphanumeric = query.chars().filter(|c| !c.is_alphanumeric() && !c.is_whitespace()).count();
    if query.chars().filter(|c| !c.is_whitespace()).count() > 0
        && (non_alphanumeric as f64 / query.chars().filter(|c| !c.is_whitespace()).count() as f64) > 0.5
    {
        return Some(Rejection::MostlyNonAlphanumeric);
    }

    if has_character_repeated_more_than(query, 5) {
        return Some(Rejection::ExcessiveCharacterRepetition);
    }

    None
}

fn has_repeated_empty_operators(query: &str) -> bool {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    let mut run = 0;
    for tok in &tokens {
        if tok.ends_with(':') {
            run += 1;
            if run >= 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

fn has_character_repeated_more_than(query: &str, limit: usize) -> bool {
    let mut last: Option<char> = None;
    let mut run = 0;
    for c in query.chars() {
        if Some(c) == last {
            run += 1;
            if run > limit {
                return true;
            }
        } else {
            last = Some(c);
            run = 1;
        }
    }
    false
}

/// Strip duplicate tokens and inline empty operators (§4.10 step 1).
fn strip_duplicate_tokens(query: &str) -> String {
    let mut seen = std::collections::HashSet::new();
    query
        .split_whitespace()
        .filter(|t| !t.ends_with(':'))
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// §4.10 step 6: already contains Scryfall operators whose keys are
/// valid, and more than 70% of whitespace-separated tokens are operator
/// tokens.
fn looks_like_raw_syntax(query: &str) -> bool {
    static KEY_TOKEN: std::sync::LazyLock<regex::Regex> =
        std::sync::LazyLock::new(|| regex::Regex::new(r"^-?(\w+)[:=<>]").unwrap());

    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.is_empty() {
        return false;
    }

    let operator_tokens = tokens
        .iter()
        .filter(|t| {
            KEY_TOKEN
                .captures(t)
                .map(|caps| crate::tables::search_keys::VALID_SEARCH_KEYS.contains(&caps[1]))
                .unwrap_or(false)
        })
        .count();

    operator_tokens > 0 && (operator_tokens as f64 / tokens.len() as f64) > RAW_SYNTAX_OPERATOR_RATIO
}

fn rejection_response(original_query: String, rejection: Rejection, started: Instant) -> TranslationResponse {
    let message = match rejection {
        Rejection::TooShort => "query must be at least 3 characters",
        Rejection::TooManyOperators => "too many operator-like tokens",
        Rejection::RepeatedEmptyOperators => "repeated empty operators",
        Rejection::MostlyNonAlphanumeric => "query is mostly non-alphanumeric",
        Rejection::ExcessiveCharacterRepetition => "a character repeats excessively",
    };

    TranslationResponse {
        original_query,
        scryfall_query: String::new(),
        explanation: Explanation { readable: message.to_string(), assumptions: vec![], confidence: 0.0 },
        response_time_ms: started.elapsed().as_millis() as u64,
        success: false,
        source: Source::Fallback,
        cached: None,
        fallback: None,
        validation_issues: Some(vec![message.to_string()]),
    }
}

fn finish_cached(original_query: String, outcome: TranslationOutcome, started: Instant) -> TranslationResponse {
    let mut response = TranslationResponse::from_outcome(
        original_query,
        outcome,
        Source::Cache,
        started.elapsed().as_millis() as u64,
    );
    response.cached = Some(true);
    response
}

async fn finish(
    services: &Arc<Services>,
    request: &TranslateRequest,
    original_query: String,
    outcome: TranslationOutcome,
    source: Source,
    started: Instant,
    fingerprint: Option<String>,
) -> TranslationResponse {
    if let Some(fingerprint) = fingerprint {
        services.cache.put(&fingerprint, &request.query, &outcome).await;
    }

    let mut response = TranslationResponse::from_outcome(
        original_query,
        outcome,
        source,
        started.elapsed().as_millis() as u64,
    );
    if matches!(source, Source::Fallback | Source::AiFailureFallback) {
        response.fallback = Some(true);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::durable::InMemoryDurableCache;

    /// Services with an LLM key configured (so the step-5 gate passes and
    /// requests reach raw-syntax/deterministic/pattern handling), but no
    /// actual `LlmClient` — any query with non-empty residual text after
    /// the deterministic parser surfaces `AiUnavailable` and recovers to
    /// the fallback builder, exactly as a real LLM outage would.
    async fn test_services() -> Arc<Services> {
        Arc::new(Services {
            cache: Cache::new(Arc::new(InMemoryDurableCache::new())),
            breaker: CircuitBreaker::new(),
            patterns: PatternTable::load(&crate::pattern_table::EmptyRuleStore).await,
            llm: None,
            config: Config {
                llm_api_key: Some("test-key".to_string()),
                llm_base_url: "https://example.invalid".to_string(),
                llm_timeout: std::time::Duration::from_secs(15),
                database_url: None,
                log_all_translations: false,
                run_query_validation_checks: false,
            },
            tasks: TaskQueue::spawn(),
        })
    }

    /// Services with no LLM key at all, exercising the step-5 gate that
    /// sends every request straight to the fallback builder.
    async fn test_services_no_key() -> Arc<Services> {
        Arc::new(Services {
            cache: Cache::new(Arc::new(InMemoryDurableCache::new())),
            breaker: CircuitBreaker::new(),
            patterns: PatternTable::load(&crate::pattern_table::EmptyRuleStore).await,
            llm: None,
            config: Config {
                llm_api_key: None,
                llm_base_url: "https://example.invalid".to_string(),
                llm_timeout: std::time::Duration::from_secs(15),
                database_url: None,
                log_all_translations: false,
                run_query_validation_checks: false,
            },
            tasks: TaskQueue::spawn(),
        })
    }

    #[tokio::test]
    async fn short_query_is_rejected() {
        let services = test_services().await;
        let response = translate(&services, TranslateRequest { query: "ab".to_string(), ..Default::default() }).await;
        assert!(!response.success);
    }

    #[tokio::test]
    async fn deterministic_query_resolves_without_llm() {
        let services = test_services().await;
        let response = translate(
            &services,
            TranslateRequest { query: "mono red creatures".to_string(), use_cache: true, ..Default::default() },
        )
        .await;
        assert!(response.success);
        assert_eq!(response.source, Source::Deterministic);
        assert!(response.scryfall_query.contains("c=r"));
    }

    #[tokio::test]
    async fn missing_llm_key_falls_back_for_every_query() {
        let services = test_services_no_key().await;
        let response = translate(
            &services,
            TranslateRequest { query: "mono red creatures".to_string(), ..Default::default() },
        )
        .await;
        assert!(response.success);
        assert_eq!(response.source, Source::Fallback);
        assert_eq!(response.fallback, Some(true));
    }

    #[tokio::test]
    async fn ai_unavailable_with_residual_text_falls_back() {
        let services = test_services().await;
        let response = translate(
            &services,
            TranslateRequest { query: "cards that make my opponent discard their hand".to_string(), ..Default::default() },
        )
        .await;
        assert!(response.success);
        assert_eq!(response.source, Source::AiFailureFallback);
        assert_eq!(response.fallback, Some(true));
    }

    #[tokio::test]
    async fn simulated_ai_failure_records_circuit_failure_and_falls_back() {
        let services = test_services().await;
        let response = translate(
            &services,
            TranslateRequest {
                query: "cards that make my opponent discard their hand".to_string(),
                debug: DebugOptions { force_fallback: false, simulate_ai_failure: true },
                ..Default::default()
            },
        )
        .await;
        assert_eq!(response.source, Source::AiFailureFallback);
    }

    #[tokio::test]
    async fn forced_fallback_skips_everything_else() {
        let services = test_services().await;
        let response = translate(
            &services,
            TranslateRequest {
                query: "mono red creatures".to_string(),
                debug: DebugOptions { force_fallback: true, simulate_ai_failure: false },
                ..Default::default()
            },
        )
        .await;
        assert_eq!(response.source, Source::Fallback);
    }

    #[tokio::test]
    async fn pattern_match_hit_short_circuits() {
        let services = test_services().await;
        let response = translate(
            &services,
            TranslateRequest { query: "mana rocks".to_string(), use_cache: true, ..Default::default() },
        )
        .await;
        assert_eq!(response.source, Source::PatternMatch);
        assert_eq!(response.scryfall_query, "otag:manarock");
    }

    #[tokio::test]
    async fn cache_hit_is_reported_as_cached() {
        let services = test_services().await;
        let first = translate(
            &services,
            TranslateRequest { query: "mono red creatures".to_string(), use_cache: true, ..Default::default() },
        )
        .await;
        assert!(first.success);
        let second = translate(
            &services,
            TranslateRequest { query: "mono red creatures".to_string(), use_cache: true, ..Default::default() },
        )
        .await;
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.cached, Some(true));
    }

    #[test]
    fn raw_syntax_is_detected_by_operator_density() {
        assert!(looks_like_raw_syntax("t:creature c:r mv<3"));
        assert!(!looks_like_raw_syntax("red creatures that cost less than three"));
    }

    #[test]
    fn duplicate_tokens_are_stripped() {
        assert_eq!(strip_duplicate_tokens("red red creatures"), "red creatures");
    }

    #[test]
    fn repeated_empty_operators_are_rejected() {
        assert!(has_repeated_empty_operators("t: t: creature"));
        assert!(!has_repeated_empty_operators("t:creature c:r"));
    }
}
