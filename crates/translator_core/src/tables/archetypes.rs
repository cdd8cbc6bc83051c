//! `ArchetypeMap` — strategy word -> Scryfall expression. Each entry also
//! carries an optional list of verb phrases that should *suppress* the
//! match, e.g. "sacrifice a creature" should not trip the "aristocrats"
//! archetype on its own.

use std::collections::HashMap;
use std::sync::LazyLock;

pub struct ArchetypeEntry {
    pub syntax: &'static str,
    pub suppress_if_contains: &'static [&'static str],
}

pub static ARCHETYPE_MAP: LazyLock<HashMap<&'static str, ArchetypeEntry>> = LazyLock::new(|| {
    HashMap::from([
        (
            "aristocrats",
            ArchetypeEntry {
                syntax: "(o:\"whenever you sacrifice\" or o:\"whenever another creature dies\")",
                suppress_if_contains: &["sacrifice a creature", "sacrifice this creature"],
            },
        ),
        (
            "voltron",
            ArchetypeEntry {
                syntax: "(t:aura or t:equipment)",
                suppress_if_contains: &[],
            },
        ),
        (
            "landfall",
            ArchetypeEntry {
                syntax: "kw:landfall",
                suppress_if_contains: &[],
            },
        ),
        (
            "reanimator",
            ArchetypeEntry {
                syntax: "o:\"return target creature card from your graveyard\"",
                suppress_if_contains: &[],
            },
        ),
        (
            "tokens",
            ArchetypeEntry {
                syntax: "o:\"create a\" o:token",
                suppress_if_contains: &["token creation"],
            },
        ),
        (
            "superfriends",
            ArchetypeEntry {
                syntax: "t:planeswalker",
                suppress_if_contains: &[],
            },
        ),
        (
            "stax",
            ArchetypeEntry {
                syntax: "(o:\"players can't\" or o:\"opponents can't\")",
                suppress_if_contains: &[],
            },
        ),
        (
            "storm",
            ArchetypeEntry {
                syntax: "kw:storm",
                suppress_if_contains: &[],
            },
        ),
    ])
});

pub fn is_suppressed(entry: &ArchetypeEntry, text: &str) -> bool {
    entry.suppress_if_contains.iter().any(|p| text.contains(p))
}
