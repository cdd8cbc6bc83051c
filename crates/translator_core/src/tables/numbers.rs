//! `WordNumberMap`, `SynonymMap`, `CompanionRestrictions`.

use std::collections::HashMap;
use std::sync::LazyLock;

pub static WORD_NUMBER_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("zero", "0"),
        ("one", "1"),
        ("two", "2"),
        ("three", "3"),
        ("four", "4"),
        ("five", "5"),
        ("six", "6"),
        ("seven", "7"),
        ("eight", "8"),
        ("nine", "9"),
        ("ten", "10"),
    ])
});

/// Abbreviation/synonym -> canonical form, applied by the normalizer.
pub static SYNONYM_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("cmc", "mv"),
        ("mana value", "mv"),
        ("converted mana cost", "mv"),
        ("color identity", "ci"),
        ("colour", "color"),
        ("colours", "colors"),
    ])
});

pub struct CompanionRestriction {
    pub clauses: &'static [&'static str],
}

pub static COMPANION_RESTRICTIONS: LazyLock<HashMap<&'static str, CompanionRestriction>> =
    LazyLock::new(|| {
        HashMap::from([
            (
                "lurrus",
                CompanionRestriction {
                    clauses: &["mv<=2"],
                },
            ),
            (
                "gyruda",
                CompanionRestriction {
                    clauses: &["id:even"],
                },
            ),
            (
                "zirda",
                CompanionRestriction {
                    clauses: &["kw:activated"],
                },
            ),
        ])
    });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_becomes_digit() {
        assert_eq!(WORD_NUMBER_MAP.get("three"), Some(&"3"));
    }

    #[test]
    fn cmc_becomes_mv() {
        assert_eq!(SYNONYM_MAP.get("cmc"), Some(&"mv"));
    }
}
