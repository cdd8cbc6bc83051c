//! `ColorMap` and `MulticolorMap`.

use crate::ir::Color;
use std::collections::HashMap;
use std::sync::LazyLock;

pub static COLOR_MAP: LazyLock<HashMap<&'static str, Color>> = LazyLock::new(|| {
    HashMap::from([
        ("w", Color::W),
        ("white", Color::W),
        ("u", Color::U),
        ("blue", Color::U),
        ("b", Color::B),
        ("black", Color::B),
        ("r", Color::R),
        ("red", Color::R),
        ("g", Color::G),
        ("green", Color::G),
        ("c", Color::C),
        ("colorless", Color::C),
    ])
});

/// Guild / shard / wedge names to their concatenated color letters, in the
/// canonical WUBRG order Scryfall itself uses for multi-color identities.
pub static MULTICOLOR_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // guilds
        ("azorius", "wu"),
        ("dimir", "ub"),
        ("rakdos", "br"),
        ("gruul", "rg"),
        ("selesnya", "gw"),
        ("orzhov", "wb"),
        ("izzet", "ur"),
        ("golgari", "bg"),
        ("boros", "rw"),
        ("simic", "gu"),
        // shards
        ("bant", "gwu"),
        ("esper", "wub"),
        ("grixis", "ubr"),
        ("jund", "brg"),
        ("naya", "rgw"),
        // wedges
        ("abzan", "wbg"),
        ("jeskai", "urw"),
        ("sultai", "bgu"),
        ("mardu", "rwb"),
        ("temur", "gur"),
        // four/five color
        ("wubrg", "wubrg"),
        ("five-color", "wubrg"),
        ("five color", "wubrg"),
    ])
});

pub fn color_letters(name: &str) -> Option<&'static str> {
    MULTICOLOR_MAP.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guild_names_resolve() {
        assert_eq!(color_letters("rakdos"), Some("br"));
        assert_eq!(color_letters("esper"), Some("wub"));
    }

    #[test]
    fn single_letter_and_word_colors_agree() {
        assert_eq!(COLOR_MAP.get("r"), COLOR_MAP.get("red"));
    }
}
