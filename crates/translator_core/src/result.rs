//! The shared result shape returned by the orchestrator, cached across
//! both tiers, and serialized over HTTP.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub readable: String,
    pub assumptions: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Deterministic,
    PatternMatch,
    Ai,
    Fallback,
    AiFailureFallback,
    RawSyntax,
    CardName,
    Cache,
}

impl Source {
    /// Whether this source short-circuited the pipeline before the
    /// deterministic/LLM stages ran at all (cache, pattern match, raw
    /// syntax, card-name).
    pub fn is_short_circuit(self) -> bool {
        matches!(self, Source::Cache | Source::PatternMatch | Source::RawSyntax | Source::CardName)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationOutcome {
    pub scryfall_query: String,
    pub explanation: Explanation,
    pub show_affiliate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub original_query: String,
    pub scryfall_query: String,
    pub explanation: Explanation,
    pub response_time_ms: u64,
    pub success: bool,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_issues: Option<Vec<String>>,
}

impl TranslationResponse {
    pub fn from_outcome(
        original_query: String,
        outcome: TranslationOutcome,
        source: Source,
        response_time_ms: u64,
    ) -> Self {
        Self {
            original_query,
            scryfall_query: outcome.scryfall_query,
            explanation: outcome.explanation,
            response_time_ms,
            success: true,
            source,
            cached: None,
            fallback: None,
            validation_issues: None,
        }
    }
}
