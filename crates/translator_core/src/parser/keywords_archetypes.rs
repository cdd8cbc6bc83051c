//! Stages 7-8: keyword abilities and archetypes.

use crate::ir::SearchIr;
use crate::tables::archetypes::{is_suppressed, ARCHETYPE_MAP};
use crate::tables::keywords::KEYWORD_MAP;

/// Stage 7: three regex passes — "with/has FOO", "FOO creature(s)", then
/// bare "FOO" — each matched keyword added at most once (IR dedupes).
pub fn apply_keywords(ir: &mut SearchIr, remaining: &mut String) {
    let mut matched_keywords: Vec<&'static str> = Vec::new();

    for (word, syntax) in KEYWORD_MAP.iter() {
        let with_has = [format!("with {word}"), format!("has {word}")];
        for phrase in &with_has {
            if remaining.contains(phrase.as_str()) {
                record_keyword(ir, &mut matched_keywords, word, syntax);
                *remaining = remaining.replacen(phrase.as_str(), "", 1);
            }
        }
    }

    for (word, syntax) in KEYWORD_MAP.iter() {
        let creature_forms = [format!("{word} creature"), format!("{word} creatures")];
        for phrase in &creature_forms {
            if remaining.contains(phrase.as_str()) {
                record_keyword(ir, &mut matched_keywords, word, syntax);
                ir.push_type("creature");
                *remaining = remaining.replacen(phrase.as_str(), "", 1);
            }
        }
    }

    for (word, syntax) in KEYWORD_MAP.iter() {
        if remaining.contains(word) {
            record_keyword(ir, &mut matched_keywords, word, syntax);
            *remaining = remaining.replacen(word, "", 1);
        }
    }
}

fn record_keyword(
    ir: &mut SearchIr,
    matched: &mut Vec<&'static str>,
    word: &'static str,
    syntax: &'static str,
) {
    if matched.contains(&word) {
        return;
    }
    matched.push(word);
    ir.push_tag(syntax.to_string());
}

/// Stage 8: archetype words, with lookahead suppression for verb phrases.
pub fn apply_archetypes(ir: &mut SearchIr, remaining: &mut String) {
    for (word, entry) in ARCHETYPE_MAP.iter() {
        if remaining.contains(word) && !is_suppressed(entry, remaining) {
            ir.push_special(entry.syntax.to_string());
            *remaining = remaining.replacen(word, "", 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flying_keyword_is_detected() {
        let mut ir = SearchIr::new();
        let mut remaining = "flying creatures".to_string();
        apply_keywords(&mut ir, &mut remaining);
        assert!(ir.tags.contains(&"kw:flying".to_string()));
        assert!(ir.types.contains(&"creature".to_string()));
    }

    #[test]
    fn aristocrats_suppressed_when_verb_phrase_present() {
        let mut ir = SearchIr::new();
        let mut remaining = "sacrifice a creature deck".to_string();
        apply_archetypes(&mut ir, &mut remaining);
        assert!(ir.specials.is_empty());
    }

    #[test]
    fn aristocrats_matches_plain_word() {
        let mut ir = SearchIr::new();
        let mut remaining = "aristocrats deck".to_string();
        apply_archetypes(&mut ir, &mut remaining);
        assert_eq!(ir.specials.len(), 1);
    }
}
