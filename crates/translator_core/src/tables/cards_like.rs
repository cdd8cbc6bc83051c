//! `CardsLikeMap` — known card name -> representative query for
//! functional equivalents.

use std::collections::HashMap;
use std::sync::LazyLock;

pub static CARDS_LIKE_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (
            "sol ring",
            "t:artifact mv<=1 o:\"add\" o:\"colorless mana\" -t:creature",
        ),
        (
            "lightning bolt",
            "(t:instant or t:sorcery) mv<=1 o:\"damage to any target\"",
        ),
        (
            "swords to plowshares",
            "t:instant o:\"exile target creature\" o:\"gains life\"",
        ),
        (
            "rhystic study",
            "o:\"whenever an opponent casts a spell\" o:draw",
        ),
        (
            "demonic tutor",
            "(t:instant or t:sorcery) o:\"search your library for a card\"",
        ),
    ])
});
