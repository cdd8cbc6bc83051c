//! Stage 1: card-name short-circuit.
//!
//! If the raw input looks like a card name, every other stage is skipped
//! and a deterministic query is emitted directly from an empty IR.

use crate::tables::keywords::KEYWORD_MAP;
use crate::tables::search_keys::VALID_SEARCH_KEYS;

/// Single-word MTG keywords that disqualify the short-circuit even though
/// they're "one word, no colon" — e.g. a bare "flying" query.
fn looks_like_keyword(word: &str) -> bool {
    KEYWORD_MAP.contains_key(word)
}

fn contains_search_vocabulary(text: &str) -> bool {
    text.split_whitespace().any(|tok| {
        let key = tok.split(':').next().unwrap_or("");
        !key.is_empty() && key != tok && VALID_SEARCH_KEYS.contains(key)
    })
}

/// Returns `Some(query)` when the input should short-circuit straight to
/// a deterministic query, bypassing the whole cascade.
pub fn try_card_name_short_circuit(normalized: &str, raw: &str) -> Option<String> {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() || words.len() > 6 {
        return None;
    }
    if contains_search_vocabulary(normalized) {
        return None;
    }
    if words.len() == 1 && looks_like_keyword(words[0]) {
        return None;
    }
    // Disqualify obvious operator/boolean noise.
    if normalized.contains(':') || normalized.contains('(') || normalized.contains('"') {
        return None;
    }

    // "Mostly capitalised" is judged on the raw (pre-lowercasing) input:
    // every word must start uppercase, save for short connector words and
    // a trailing possessive.
    let raw_words: Vec<&str> = raw.split_whitespace().collect();
    if raw_words.len() != words.len() {
        return None;
    }
    let connectors = ["of", "the", "a", "an", "and", "on"];
    let mostly_capitalised = raw_words.iter().all(|w| {
        let core = w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'');
        let lower = core.to_lowercase();
        connectors.contains(&lower.as_str())
            || core.chars().next().is_some_and(|c| c.is_uppercase())
    });
    if !mostly_capitalised {
        return None;
    }

    if raw_words.len() == 1 {
        Some(format!("name:{}", raw_words[0].trim_end_matches("'s")))
    } else {
        let mut words = raw_words.to_vec();
        words[0] = words[0].trim_start_matches(|c| c == '!' || c == '"');
        Some(format!("!\"{}\"", words.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_merchant_short_circuits_to_exact_name() {
        let raw = "Gray Merchant of Asphodel";
        let normalized = raw.to_lowercase();
        let result = try_card_name_short_circuit(&normalized, raw);
        assert_eq!(
            result,
            Some("!\"Gray Merchant of Asphodel\"".to_string())
        );
    }

    #[test]
    fn leading_exact_name_sigil_is_not_doubled() {
        let raw = "!Gray Merchant of Asphodel";
        let normalized = raw.to_lowercase();
        let result = try_card_name_short_circuit(&normalized, raw);
        assert_eq!(
            result,
            Some("!\"Gray Merchant of Asphodel\"".to_string())
        );
    }

    #[test]
    fn search_syntax_does_not_short_circuit() {
        assert_eq!(
            try_card_name_short_circuit("c:red t:creature", "c:red t:creature"),
            None
        );
    }

    #[test]
    fn bare_keyword_does_not_short_circuit() {
        assert_eq!(try_card_name_short_circuit("flying", "flying"), None);
    }

    #[test]
    fn lowercase_phrase_does_not_short_circuit() {
        assert_eq!(
            try_card_name_short_circuit("cheap green ramp", "cheap green ramp"),
            None
        );
    }
}
