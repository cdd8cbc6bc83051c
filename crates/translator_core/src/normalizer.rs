//! Normalizer. Deterministic, pure: lowercase, unify quote
//! glyphs, expand slang/abbreviations, convert word-numbers to digits,
//! collapse whitespace.

use crate::tables::numbers::{SYNONYM_MAP, WORD_NUMBER_MAP};
use std::sync::LazyLock;

static WORD_BOUNDARY_SPACE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\s+").unwrap());

/// Normalize raw user text (spec caps input at 500 chars upstream, in the
/// orchestrator's input sanitisation).
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_lowercase();

    // Unify quote glyphs to plain ASCII quotes.
    text = text
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"");

    // Expand MTG abbreviations / synonyms, longest-phrase-first so
    // "converted mana cost" is not partially eaten by a shorter rule.
    let mut synonyms: Vec<(&&str, &&str)> = SYNONYM_MAP.iter().collect();
    synonyms.sort_by_key(|(k, _)| std::cmp::Reverse(k.len()));
    for (phrase, replacement) in synonyms {
        text = replace_word_boundary(&text, phrase, replacement);
    }

    // Word numbers -> digits.
    for (word, digit) in WORD_NUMBER_MAP.iter() {
        text = replace_word_boundary(&text, word, digit);
    }

    WORD_BOUNDARY_SPACE.replace_all(text.trim(), " ").to_string()
}

/// Replace whole-word occurrences of `needle` with `replacement`,
/// respecting word boundaries so "tour" is not mangled by a "tou" rule.
fn replace_word_boundary(haystack: &str, needle: &str, replacement: &str) -> String {
    let pattern = format!(r"\b{}\b", regex::escape(needle));
    let re = regex::Regex::new(&pattern).expect("static pattern is valid regex");
    re.replace_all(haystack, replacement).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Cheap   GREEN Ramp "), "cheap green ramp");
    }

    #[test]
    fn expands_cmc_to_mv() {
        assert_eq!(normalize("cmc 3"), "mv 3");
    }

    #[test]
    fn expands_mana_value_to_mv() {
        assert_eq!(normalize("mana value 3"), "mv 3");
    }

    #[test]
    fn expands_color_identity_to_ci() {
        assert_eq!(normalize("color identity blue"), "ci blue");
    }

    #[test]
    fn converts_word_numbers_to_digits() {
        assert_eq!(normalize("three reprints"), "3 reprints");
    }

    #[test]
    fn unifies_curly_quotes() {
        assert_eq!(normalize("\u{201C}draw a card\u{201D}"), "\"draw a card\"");
    }

    #[test]
    fn does_not_mangle_substrings() {
        // "tou" (toughness abbreviation candidate) should never eat "tour".
        assert_eq!(normalize("detour"), "detour");
    }
}
