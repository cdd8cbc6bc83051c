//! LLM client (C9): a timeout- and retry-wrapped chat-completion call,
//! response-shape validation, and flexible content extraction.

use crate::error::{Result, TranslatorError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_RETRIES: u32 = 2;
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];
const BACKOFF_UNIT: Duration = Duration::from_millis(400);

/// Word-count tiers driving system-prompt verbosity (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTier {
    Simple,
    Medium,
    Complex,
}

impl PromptTier {
    pub fn for_query(query: &str) -> Self {
        match query.split_whitespace().count() {
            0..=4 => PromptTier::Simple,
            5..=12 => PromptTier::Medium,
            _ => PromptTier::Complex,
        }
    }
}

/// Lighter model for ordinary queries, stronger/dedicated model for
/// suspected card names and non-English input (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Light,
    Strong,
}

impl Model {
    pub fn as_str(self) -> &'static str {
        match self {
            Model::Light => "google/gemini-2.5-flash",
            Model::Strong => "google/gemini-2.5-pro",
        }
    }

    pub fn select(looks_like_card_name: bool, is_non_english: bool) -> Self {
        if looks_like_card_name || is_non_english {
            Model::Strong
        } else {
            Model::Light
        }
    }
}

/// A non-Latin script, or Latin text carrying non-ASCII diacritics, is
/// treated as non-English and routed through a pre-translation call
/// (§4.9).
pub fn looks_non_english(query: &str) -> bool {
    query.chars().any(|c| !c.is_ascii() && !c.is_whitespace())
}

fn build_system_prompt(tier: PromptTier, dynamic_rules: &[String]) -> String {
    let base = match tier {
        PromptTier::Simple => {
            "Translate this short Magic: The Gathering card search into a Scryfall query. \
             Reply with either the raw Scryfall syntax or a fenced JSON object \
             {\"scryfallQuery\", \"explanation\", \"confidence\"}."
        }
        PromptTier::Medium => {
            "Translate this Magic: The Gathering card search into a Scryfall query, \
             accounting for colors, types, and numeric constraints. Reply with either \
             the raw Scryfall syntax or a fenced JSON object \
             {\"scryfallQuery\", \"explanation\", \"confidence\"}."
        }
        PromptTier::Complex => {
            "Translate this detailed Magic: The Gathering card search into a precise \
             Scryfall query, carefully reconciling every clause (colors, types, \
             keywords, numeric bounds, oracle text) into valid Scryfall search \
             syntax. Reply with either the raw Scryfall syntax or a fenced JSON \
             object {\"scryfallQuery\", \"explanation\", \"confidence\"}."
        }
    };

    if dynamic_rules.is_empty() {
        base.to_string()
    } else {
        format!("{base}\n\nKnown translation rules:\n{}", dynamic_rules.join("\n"))
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// The parsed outcome of a single translation call, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmTranslation {
    #[serde(rename = "scryfallQuery")]
    pub scryfall_query: String,
    pub explanation: String,
    pub confidence: f64,
}

pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client builder should not fail for a static config");
        Self { http, base_url, api_key }
    }

    /// Translate `query` directly to English. Used as the pre-translation
    /// step for non-Latin-script/non-ASCII input (§4.9) ahead of the main
    /// translation call.
    pub async fn translate_to_english(&self, query: &str) -> Result<String> {
        let messages = vec![
            ChatMessage { role: "system", content: "Translate the user's text to English. Reply with only the translation.".to_string() },
            ChatMessage { role: "user", content: query.to_string() },
        ];
        let raw = self.chat(Model::Strong, messages).await?;
        Ok(raw.trim().to_string())
    }

    /// Run the main translation call for `query`, building the system
    /// prompt from `tier` and `dynamic_rules`, using `model`.
    pub async fn translate(
        &self,
        query: &str,
        tier: PromptTier,
        model: Model,
        dynamic_rules: &[String],
    ) -> Result<LlmTranslation> {
        let messages = vec![
            ChatMessage { role: "system", content: build_system_prompt(tier, dynamic_rules) },
            ChatMessage { role: "user", content: query.to_string() },
        ];
        let raw = self.chat(model, messages).await?;
        parse_translation_content(&raw)
    }

    async fn chat(&self, model: Model, messages: Vec<ChatMessage>) -> Result<String> {
        let body = ChatRequest { model: model.as_str().to_string(), messages, temperature: 0.2 };

        let mut attempt: u32 = 0;
        loop {
            let result = self
                .http
                .post(format!("{}/v1/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed: ChatResponse = response
                            .json()
                            .await
                            .map_err(|e| TranslatorError::LlmResponseMalformed(e.to_string()))?;
                        let content = parsed
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|c| c.message.content)
                            .ok_or_else(|| {
                                TranslatorError::LlmResponseMalformed(
                                    "choices[0].message.content missing".to_string(),
                                )
                            })?;
                        return Ok(content);
                    }

                    if RETRYABLE_STATUSES.contains(&status.as_u16()) && attempt < MAX_RETRIES {
                        attempt += 1;
                        tokio::time::sleep(BACKOFF_UNIT * attempt).await;
                        continue;
                    }

                    return Err(TranslatorError::AiCallFailed(format!("status {status}")));
                }
                Err(err) if err.is_timeout() && attempt < MAX_RETRIES => {
                    attempt += 1;
                    tokio::time::sleep(BACKOFF_UNIT * attempt).await;
                    continue;
                }
                Err(err) => return Err(TranslatorError::AiCallFailed(err.to_string())),
            }
        }
    }
}

/// Accepts either a raw Scryfall query string or a fenced code block
/// containing a JSON object `{scryfallQuery, explanation, confidence}`
/// (§4.9). A bare string is treated as the query with a default
/// confidence and no explanation text.
fn parse_translation_content(raw: &str) -> Result<LlmTranslation> {
    let trimmed = raw.trim();

    if let Some(json) = extract_fenced_json(trimmed) {
        return serde_json::from_str(&json)
            .map_err(|e| TranslatorError::LlmResponseMalformed(format!("malformed JSON payload: {e}")));
    }

    if trimmed.starts_with('{') {
        if let Ok(translation) = serde_json::from_str::<LlmTranslation>(trimmed) {
            return Ok(translation);
        }
    }

    Ok(LlmTranslation {
        scryfall_query: trimmed.to_string(),
        explanation: "AI-generated query".to_string(),
        confidence: 0.75,
    })
}

fn extract_fenced_json(text: &str) -> Option<String> {
    let start = text.find("```")?;
    let after_open = &text[start + 3..];
    let after_open = after_open.strip_prefix("json").unwrap_or(after_open);
    let end = after_open.find("```")?;
    Some(after_open[..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_selection_follows_word_count() {
        assert_eq!(PromptTier::for_query("red creatures"), PromptTier::Simple);
        assert_eq!(PromptTier::for_query("red creatures with flying and haste under five mana"), PromptTier::Medium);
        assert_eq!(
            PromptTier::for_query("red creatures with flying and haste that cost less than five mana and have power greater than toughness and are legal in commander"),
            PromptTier::Complex
        );
    }

    #[test]
    fn model_selection_prefers_strong_for_card_names_and_non_english() {
        assert_eq!(Model::select(true, false), Model::Strong);
        assert_eq!(Model::select(false, true), Model::Strong);
        assert_eq!(Model::select(false, false), Model::Light);
    }

    #[test]
    fn non_ascii_input_is_flagged_non_english() {
        assert!(looks_non_english("criaturas vermelhas"));
        assert!(looks_non_english("赤いクリーチャー"));
        assert!(!looks_non_english("red creatures"));
    }

    #[test]
    fn parses_raw_scryfall_string_content() {
        let translation = parse_translation_content("t:creature c:r").unwrap();
        assert_eq!(translation.scryfall_query, "t:creature c:r");
        assert_eq!(translation.confidence, 0.75);
    }

    #[test]
    fn parses_fenced_json_content() {
        let raw = "```json\n{\"scryfallQuery\": \"t:creature c:r\", \"explanation\": \"red creatures\", \"confidence\": 0.88}\n```";
        let translation = parse_translation_content(raw).unwrap();
        assert_eq!(translation.scryfall_query, "t:creature c:r");
        assert_eq!(translation.confidence, 0.88);
    }

    #[test]
    fn parses_bare_json_content_without_fences() {
        let raw = "{\"scryfallQuery\": \"t:creature\", \"explanation\": \"creatures\", \"confidence\": 0.8}";
        let translation = parse_translation_content(raw).unwrap();
        assert_eq!(translation.scryfall_query, "t:creature");
    }

    #[test]
    fn malformed_fenced_json_is_an_error() {
        let raw = "```json\n{not valid json\n```";
        assert!(parse_translation_content(raw).is_err());
    }
}
