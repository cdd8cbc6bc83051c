//! Stages 4-6: tag-first mappings, token creation, and enablers/"grants X".

use crate::ir::SearchIr;
use crate::tables::tags::{ART_TAG_MAP, KNOWN_OTAGS, TAG_FIRST_MAP};

/// Stage 4: regex -> `otag:X` with allowlist guard.
pub fn apply_tag_first(ir: &mut SearchIr, remaining: &mut String) {
    for (phrase, entry) in TAG_FIRST_MAP.iter() {
        if remaining.contains(phrase) {
            if KNOWN_OTAGS.contains(entry.otag) {
                ir.push_tag(format!("otag:{}", entry.otag));
            } else {
                ir.warn(format!(
                    "oracle tag 'otag:{}' is not on the allowlist, using oracle-text fallback",
                    entry.otag
                ));
                ir.push_oracle(entry.fallback.to_string());
            }
            *remaining = remaining.replacen(phrase, "", 1);
        }
    }
}

/// `ArtTagMap`: regex pattern -> `atag:X`, same shape as tag-first but
/// kept separate since art tags have no allowlist or oracle fallback.
pub fn apply_art_tags(ir: &mut SearchIr, remaining: &mut String) {
    for (phrase, atag) in ART_TAG_MAP.iter() {
        if remaining.contains(phrase) {
            ir.push_art_tag((*atag).to_string());
            *remaining = remaining.replacen(phrase, "", 1);
        }
    }
}

/// Stage 5: "creates treasure tokens" — must run before type parsing so
/// the word "token" does not become `t:token`.
pub fn apply_token_creation(ir: &mut SearchIr, remaining: &mut String) {
    let markers = [
        ("treasure token", "o:\"create a Treasure token\""),
        ("treasure tokens", "o:\"create a Treasure token\""),
        ("clue token", "o:\"create a Clue token\""),
        ("clue tokens", "o:\"create a Clue token\""),
        ("food token", "o:\"create a Food token\""),
        ("food tokens", "o:\"create a Food token\""),
        ("creature token", "o:\"create a\" o:\"creature token\""),
        ("creature tokens", "o:\"create a\" o:\"creature token\""),
    ];
    for (phrase, syntax) in markers {
        if remaining.contains(phrase) {
            ir.push_oracle(syntax.to_string());
            *remaining = remaining.replacen(phrase, "", 1);
        }
    }
}

/// Stage 6: enablers / "grants X" -> `gives-X` oracle tags or fallbacks.
pub fn apply_enablers(ir: &mut SearchIr, remaining: &mut String) {
    let grants = [
        ("gives flying", "gives-flying", "o:\"target creature you control gains flying\""),
        ("grants flying", "gives-flying", "o:\"target creature you control gains flying\""),
        ("gives hexproof", "gives-hexproof", "o:\"gains hexproof\""),
        ("grants hexproof", "gives-hexproof", "o:\"gains hexproof\""),
        (
            "gives indestructible",
            "gives-indestructible",
            "o:\"gains indestructible\"",
        ),
    ];
    for (phrase, otag, fallback) in grants {
        if remaining.contains(phrase) {
            if KNOWN_OTAGS.contains(otag) {
                ir.push_tag(format!("otag:{otag}"));
            } else {
                ir.warn(format!("'{phrase}' approximated with an oracle-text fallback"));
                ir.push_oracle(fallback.to_string());
            }
            *remaining = remaining.replacen(phrase, "", 1);
        }
    }
}
