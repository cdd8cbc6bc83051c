//! Stages 9-10: type exclusions and companions.

use crate::ir::SearchIr;
use crate::tables::numbers::COMPANION_RESTRICTIONS;

const EXCLUDABLE_TYPES: &[&str] = &[
    "creature",
    "artifact",
    "enchantment",
    "instant",
    "sorcery",
    "land",
    "planeswalker",
];

/// Stage 9: "not a creature", "non-artifact", "creature-less" -> excluded
/// types.
pub fn apply_exclusions(ir: &mut SearchIr, remaining: &mut String) {
    for t in EXCLUDABLE_TYPES {
        let forms = [
            format!("not a {t}"),
            format!("non-{t}"),
            format!("non {t}"),
            format!("{t}-less"),
        ];
        for phrase in &forms {
            if remaining.contains(phrase.as_str()) {
                ir.push_excluded_type(*t);
                *remaining = remaining.replacen(phrase.as_str(), "", 1);
            }
        }
    }
}

/// Stage 10: "companion" with a named companion emits its deckbuilding
/// restriction clauses; otherwise `is:companion`.
pub fn apply_companions(ir: &mut SearchIr, remaining: &mut String) {
    if !remaining.contains("companion") {
        return;
    }

    let mut matched_named = false;
    for (name, restriction) in COMPANION_RESTRICTIONS.iter() {
        if remaining.contains(name) {
            for clause in restriction.clauses {
                ir.push_special(clause.to_string());
            }
            *remaining = remaining.replacen(name, "", 1);
            matched_named = true;
        }
    }

    if !matched_named {
        ir.push_special("is:companion".to_string());
    }
    *remaining = remaining.replacen("companion", "", 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_creature_becomes_excluded_type() {
        let mut ir = SearchIr::new();
        let mut remaining = "non-creature artifact".to_string();
        apply_exclusions(&mut ir, &mut remaining);
        assert!(ir.excluded_types.contains(&"creature".to_string()));
    }

    #[test]
    fn bare_companion_maps_to_is_companion() {
        let mut ir = SearchIr::new();
        let mut remaining = "companion".to_string();
        apply_companions(&mut ir, &mut remaining);
        assert!(ir.specials.contains(&"is:companion".to_string()));
    }

    #[test]
    fn named_companion_emits_restriction_clause() {
        let mut ir = SearchIr::new();
        let mut remaining = "lurrus companion".to_string();
        apply_companions(&mut ir, &mut remaining);
        assert!(ir.specials.contains(&"mv<=2".to_string()));
        assert!(!ir.specials.contains(&"is:companion".to_string()));
    }
}
