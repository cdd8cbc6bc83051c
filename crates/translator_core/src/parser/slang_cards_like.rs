//! Stages 2-3: slang terms and cards-like.

use crate::ir::SearchIr;
use crate::tables::cards_like::CARDS_LIKE_MAP;
use crate::tables::slang::SLANG_TO_SYNTAX;

/// Stage 2: slang-to-syntax phrases, consumed before cards-like so that
/// e.g. "X alternatives" isn't stolen by the cards-like stage.
pub fn apply_slang(ir: &mut SearchIr, remaining: &mut String) {
    for (phrase, syntax) in SLANG_TO_SYNTAX.iter() {
        if remaining.contains(phrase) {
            ir.push_special((*syntax).to_string());
            *remaining = remaining.replacen(phrase, "", 1);
        }
    }
}

/// Stage 3: "cards like X" / "X alternatives".
pub fn apply_cards_like(ir: &mut SearchIr, remaining: &mut String) {
    let patterns = [" alternatives", "cards like "];
    for marker in patterns {
        if let Some(idx) = remaining.find(marker) {
            let card_name = extract_card_name(remaining, marker, idx);
            if let Some(name) = card_name {
                match CARDS_LIKE_MAP.get(name.as_str()) {
                    Some(syntax) => ir.push_special((*syntax).to_string()),
                    None => {
                        ir.warn(format!(
                            "unrecognised card '{name}' for functional-equivalent search"
                        ));
                        ir.push_oracle(format!("o:\"{name}\""));
                    }
                }
                *remaining = remove_phrase(remaining, marker, idx, &name);
            }
        }
    }
}

fn extract_card_name(text: &str, marker: &str, idx: usize) -> Option<String> {
    if marker == "cards like " {
        let rest = &text[idx + marker.len()..];
        let name: String = rest
            .split(|c: char| c == ',' || c == '.')
            .next()
            .unwrap_or("")
            .trim()
            .to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    } else {
        let before = &text[..idx];
        let name = before
            .split_whitespace()
            .rev()
            .take(3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

fn remove_phrase(text: &str, marker: &str, idx: usize, name: &str) -> String {
    if marker == "cards like " {
        let full = format!("cards like {name}");
        text.replacen(&full, "", 1)
    } else {
        let full = format!("{name}{marker}");
        text.replacen(&full, "", 1).replacen(marker, "", idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_like_sol_ring_emits_representative_query() {
        let mut ir = SearchIr::new();
        let mut remaining = "cards like sol ring".to_string();
        apply_cards_like(&mut ir, &mut remaining);
        assert_eq!(ir.specials.len(), 1);
        assert!(ir.specials[0].contains("t:artifact"));
    }

    #[test]
    fn unknown_cards_like_warns_and_falls_back() {
        let mut ir = SearchIr::new();
        let mut remaining = "cards like some unknown card".to_string();
        apply_cards_like(&mut ir, &mut remaining);
        assert_eq!(ir.warnings.len(), 1);
        assert!(!ir.oracle.is_empty());
    }
}
