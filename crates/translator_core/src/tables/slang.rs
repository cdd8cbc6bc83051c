//! `SlangMap` and `SlangToSyntaxMap`.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Casual name -> canonical card name (simple substitution, stage 1/2
/// disambiguation decides whether this becomes `name:`/`!"..."`).
pub static SLANG_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("bolt", "Lightning Bolt"),
        ("goyf", "Tarmogoyf"),
        ("snapcaster", "Snapcaster Mage"),
        ("jace the mind sculptor", "Jace, the Mind Sculptor"),
        ("batterskull", "Batterskull"),
        ("walker", "Planeswalker"),
    ])
});

/// Regex pattern (as a literal phrase, matched case-insensitively with
/// word boundaries by the caller) -> raw Scryfall syntax fragment. These
/// run before cards-like so that phrases like "bolt alternatives" are not
/// stolen by the cards-like stage.
pub static SLANG_TO_SYNTAX: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    vec![
        ("tron", "t:land (set:atq OR set:chr)"),
        ("moxen", "t:artifact o:\"add one mana of any color\""),
        ("painland", "t:land o:\"deals 1 damage to you\""),
        ("fetchland", "t:land o:\"search your library for a\" o:\"land card\""),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bolt_resolves_to_lightning_bolt() {
        assert_eq!(SLANG_MAP.get("bolt"), Some(&"Lightning Bolt"));
    }

    #[test]
    fn tron_has_a_syntax_fragment() {
        assert!(SLANG_TO_SYNTAX.iter().any(|(k, _)| *k == "tron"));
    }
}
