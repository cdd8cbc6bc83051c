//! Stages 15-17: types (AND-logic, OR-group detection), supertypes and
//! subtypes, and the post-type mana-rock correction.

use crate::ir::SearchIr;

const CARD_TYPES: &[&str] = &[
    "creature",
    "artifact",
    "enchantment",
    "instant",
    "sorcery",
    "land",
    "planeswalker",
    "battle",
    "tribal",
];

const SUPERTYPES: &[&str] = &["legendary", "basic", "snow", "world"];

const SUBTYPES: &[&str] = &[
    "goblin", "elf", "zombie", "vampire", "human", "dragon", "angel", "demon", "wizard",
    "knight", "soldier", "merfolk", "sliver", "equipment", "aura", "forest", "island",
    "mountain", "swamp", "plains",
];

/// Stage 15: OR-patterns first ("artifact or enchantment", "A, B, or C"),
/// then remaining singular type words become AND-entries.
pub fn apply_types(ir: &mut SearchIr, remaining: &mut String) {
    apply_spell_shorthand(ir, remaining);
    apply_type_or_groups(ir, remaining);

    for t in CARD_TYPES {
        if ir.or_group_types.contains(*t) {
            continue;
        }
        let padded = format!(" {remaining} ");
        let singular = format!(" {t} ");
        let plural = format!(" {t}s ");
        if padded.contains(singular.as_str()) {
            ir.push_type(*t);
            *remaining = remaining.replacen(t, "", 1);
        } else if padded.contains(plural.as_str()) {
            ir.push_type(*t);
            *remaining = remaining.replacen(format!("{t}s").as_str(), "", 1);
        }
    }

    apply_utility_lands(ir, remaining);
}

fn apply_spell_shorthand(ir: &mut SearchIr, remaining: &mut String) {
    if remaining.contains("spells") || remaining.contains("spell") {
        // "spells" alone (not "creature spells" etc.) -> instant/sorcery OR group.
        if remaining.contains("that draw") || remaining.contains("spells that") {
            ir.push_special("(t:instant or t:sorcery)".to_string());
            ir.or_group_types.insert("instant".to_string());
            ir.or_group_types.insert("sorcery".to_string());
            *remaining = remaining.replacen("spells", "", 1);
        }
    }
}

fn apply_type_or_groups(ir: &mut SearchIr, remaining: &mut String) {
    for a in CARD_TYPES {
        for b in CARD_TYPES {
            if a == b {
                continue;
            }
            let phrase = format!("{a} or {b}");
            if remaining.contains(phrase.as_str()) {
                ir.push_special(format!("(t:{a} or t:{b})"));
                ir.or_group_types.insert((*a).to_string());
                ir.or_group_types.insert((*b).to_string());
                *remaining = remaining.replacen(phrase.as_str(), "", 1);
            }
        }
    }
}

fn apply_utility_lands(ir: &mut SearchIr, remaining: &mut String) {
    if remaining.contains("utility land") || remaining.contains("utility lands") {
        ir.push_type("land");
        ir.push_excluded_type("basic");
        *remaining = remaining.replace("utility lands", "").replace("utility land", "");
    }
}

/// Stage 16: supertypes and subtypes.
pub fn apply_supertypes_subtypes(ir: &mut SearchIr, remaining: &mut String) {
    for s in SUPERTYPES {
        let padded_word = format!(" {s} ");
        let padded_text = format!(" {remaining} ");
        if padded_text.contains(padded_word.as_str()) {
            ir.push_type(*s);
            *remaining = remaining.replacen(s, "", 1);
        }
    }
    for s in SUBTYPES {
        if remaining.contains(s) {
            ir.push_subtype(*s);
            *remaining = remaining.replacen(s, "", 1);
        }
    }
}

/// Stage 17: if `otag:manarock` is in tags, mana rocks are artifacts, not
/// lands — exclude land.
pub fn apply_post_type_correction(ir: &mut SearchIr) {
    if ir.tags.iter().any(|t| t == "otag:manarock") {
        ir.push_excluded_type("land");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_or_enchantment_becomes_or_group() {
        let mut ir = SearchIr::new();
        let mut remaining = "artifact or enchantment".to_string();
        apply_types(&mut ir, &mut remaining);
        assert!(ir.specials.contains(&"(t:artifact or t:enchantment)".to_string()));
        assert!(!ir.types.contains(&"artifact".to_string()));
    }

    #[test]
    fn manarock_excludes_land() {
        let mut ir = SearchIr::new();
        ir.push_tag("otag:manarock");
        apply_post_type_correction(&mut ir);
        assert!(ir.excluded_types.contains(&"land".to_string()));
    }

    #[test]
    fn utility_lands_adds_land_type_and_excludes_basic() {
        let mut ir = SearchIr::new();
        let mut remaining = "utility lands".to_string();
        apply_types(&mut ir, &mut remaining);
        assert!(ir.types.contains(&"land".to_string()));
        assert!(ir.excluded_types.contains(&"basic".to_string()));
    }
}
