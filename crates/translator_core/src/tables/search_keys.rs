//! The allowlist of search keys Scryfall understands, modeled after the
//! `valid_keywords` array in `scryfall/smart.rs` and extended with
//! `otag`, `atag`, `mv`, `year`, `usd`, and the other keys this
//! translator emits.

use std::collections::HashSet;
use std::sync::LazyLock;

pub static VALID_SEARCH_KEYS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "t", "c", "id", "ci", "o", "mv", "cmc", "pow", "tou", "loy", "r", "s", "set", "f",
        "is", "not", "cn", "lang", "year", "frame", "border", "game", "legal", "banned",
        "restricted", "new", "old", "reprint", "firstprint", "unique", "art", "a", "artist",
        "ft", "prints", "usd", "eur", "tix", "otag", "atag", "function", "m", "name",
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otag_and_atag_are_valid() {
        assert!(VALID_SEARCH_KEYS.contains("otag"));
        assert!(VALID_SEARCH_KEYS.contains("atag"));
    }

    #[test]
    fn foo_is_not_valid() {
        assert!(!VALID_SEARCH_KEYS.contains("foo"));
    }
}
