//! `TagFirstMap`, `ArtTagMap`, `KnownOtags`, and the removal/targeting
//! table.

use std::collections::HashSet;
use std::sync::LazyLock;

/// The oracle-tag allowlist.
pub static KNOWN_OTAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "ramp",
        "removal",
        "creature-removal",
        "draw",
        "wrath",
        "counterspell",
        "recursion",
        "tutor",
        "manarock",
        "manadork",
        "combo",
        "sacrifice-outlet",
        "gives-flying",
        "gives-hexproof",
        "gives-indestructible",
        "fog",
        "discard",
        "mill",
        "lifegain",
        "protection-spell",
        "equipment",
        "anthem",
        "extra-turn",
        "land-destruction",
        "bounce",
    ])
});

/// Regex pattern (phrase) -> oracle tag, with an oracle-text fallback used
/// when the tag is not in `KNOWN_OTAGS`.
pub struct TagFirstEntry {
    pub otag: &'static str,
    pub fallback: &'static str,
}

pub static TAG_FIRST_MAP: LazyLock<Vec<(&'static str, TagFirstEntry)>> = LazyLock::new(|| {
    vec![
        (
            "ramp",
            TagFirstEntry {
                otag: "ramp",
                fallback: "o:\"search your library for a land\"",
            },
        ),
        (
            "board wipe",
            TagFirstEntry {
                otag: "wrath",
                fallback: "o:\"destroy all creatures\"",
            },
        ),
        (
            "boardwipe",
            TagFirstEntry {
                otag: "wrath",
                fallback: "o:\"destroy all creatures\"",
            },
        ),
        (
            "mana rock",
            TagFirstEntry {
                otag: "manarock",
                fallback: "t:artifact o:\"add\" o:mana",
            },
        ),
        (
            "mana rocks",
            TagFirstEntry {
                otag: "manarock",
                fallback: "t:artifact o:\"add\" o:mana",
            },
        ),
        (
            "tutor",
            TagFirstEntry {
                otag: "tutor",
                fallback: "o:\"search your library for a card\"",
            },
        ),
        (
            "sac outlet",
            TagFirstEntry {
                otag: "sacrifice-outlet",
                fallback: "o:\"sacrifice a creature\"",
            },
        ),
        (
            "sac outlets",
            TagFirstEntry {
                otag: "sacrifice-outlet",
                fallback: "o:\"sacrifice a creature\"",
            },
        ),
        (
            "counterspell",
            TagFirstEntry {
                otag: "counterspell",
                fallback: "o:\"counter target spell\"",
            },
        ),
    ]
});

/// `ArtTagMap`: regex pattern -> art-tag token.
pub static ART_TAG_MAP: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    vec![
        ("forest art", "atag:forest"),
        ("dragon art", "atag:dragon"),
        ("full art", "atag:fullart"),
    ]
});

/// Fixed `(target phrase, effect) -> fragment` table for the
/// removal/targeting disambiguation. Each entry is
/// matched as `"<verb> creature"` against the residual text; the literal
/// word "creature" is consumed so it cannot later become `t:creature`.
pub struct TargetingEntry {
    pub verbs: &'static [&'static str],
    pub otag: Option<&'static str>,
    pub fallback: &'static str,
}

pub static TARGETING_TABLE: LazyLock<Vec<TargetingEntry>> = LazyLock::new(|| {
    vec![
        TargetingEntry {
            verbs: &["destroy", "remove", "kill", "damage"],
            otag: Some("creature-removal"),
            fallback: "o:\"destroy target creature\"",
        },
        TargetingEntry {
            verbs: &["exile"],
            otag: None,
            fallback: "o:\"exile target creature\"",
        },
        TargetingEntry {
            verbs: &["counter"],
            otag: Some("counterspell"),
            fallback: "o:\"counter target spell\"",
        },
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manarock_is_known() {
        assert!(KNOWN_OTAGS.contains("manarock"));
    }

    #[test]
    fn unknown_otag_is_absent() {
        assert!(!KNOWN_OTAGS.contains("doesnotexist"));
    }

    #[test]
    fn exile_creature_has_no_otag_by_design() {
        let entry = TARGETING_TABLE
            .iter()
            .find(|e| e.verbs.contains(&"exile"))
            .unwrap();
        assert!(entry.otag.is_none());
    }
}
