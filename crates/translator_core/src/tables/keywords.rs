//! `KeywordMap` — MTG ability keyword -> operator expression.

use std::collections::HashMap;
use std::sync::LazyLock;

pub static KEYWORD_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("flying", "kw:flying"),
        ("trample", "kw:trample"),
        ("haste", "kw:haste"),
        ("vigilance", "kw:vigilance"),
        ("deathtouch", "kw:deathtouch"),
        ("lifelink", "kw:lifelink"),
        ("first strike", "kw:\"first strike\""),
        ("double strike", "kw:\"double strike\""),
        ("hexproof", "kw:hexproof"),
        ("indestructible", "kw:indestructible"),
        ("menace", "kw:menace"),
        ("reach", "kw:reach"),
        ("flash", "kw:flash"),
        ("defender", "kw:defender"),
        ("protection", "kw:protection"),
        ("ward", "kw:ward"),
        ("cascade", "kw:cascade"),
        ("convoke", "kw:convoke"),
        ("flashback", "kw:flashback"),
        ("unearth", "kw:unearth"),
        ("kicker", "kw:kicker"),
        ("landfall", "kw:landfall"),
        ("prowess", "kw:prowess"),
        ("infect", "kw:infect"),
        ("annihilator", "kw:annihilator"),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flying_maps_to_kw_flying() {
        assert_eq!(KEYWORD_MAP.get("flying"), Some(&"kw:flying"));
    }
}
