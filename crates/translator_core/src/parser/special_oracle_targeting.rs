//! Stages 11-13: format/commander/phyrexian-mana special patterns, oracle
//! patterns, and removal/targeting disambiguation.

use crate::ir::SearchIr;
use crate::tables::tags::{KNOWN_OTAGS, TARGETING_TABLE};

const KNOWN_FORMATS: &[&str] = &[
    "standard", "pioneer", "modern", "legacy", "vintage", "pauper", "commander", "historic",
    "alchemy", "explorer", "brawl",
];

/// Stage 11: commander/format/phyrexian-mana patterns.
pub fn apply_special_patterns(ir: &mut SearchIr, remaining: &mut String) {
    for fmt in KNOWN_FORMATS {
        if *fmt == "commander" {
            continue; // handled specially below
        }
        for phrase in [format!("from {fmt}"), format!("in {fmt}")] {
            if remaining.contains(phrase.as_str()) {
                ir.push_special(format!("f:{fmt}"));
                *remaining = remaining.replacen(phrase.as_str(), "", 1);
            }
        }
    }

    if remaining.contains("commander legal")
        || remaining.contains("commander deck")
        || remaining.contains("in commander")
    {
        ir.push_special("f:commander".to_string());
        *remaining = remaining
            .replace("commander legal", "")
            .replace("commander deck", "")
            .replace("in commander", "");
    } else if remaining.contains("commander") {
        ir.push_special("is:commander".to_string());
        *remaining = remaining.replacen("commander", "", 1);
    }

    if remaining.contains("phyrexian mana") {
        ir.push_special("m:/P/".to_string());
        *remaining = remaining.replacen("phyrexian mana", "", 1);
    }
}

/// Stage 12: oracle-text pattern phrases.
pub fn apply_oracle_patterns(ir: &mut SearchIr, remaining: &mut String) {
    let patterns: &[(&str, &[&str])] = &[
        ("draw cards", &["otag:draw"]),
        ("draw a card", &["otag:draw"]),
        (
            "search for lands",
            &[
                "o:search",
                "o:library",
                "o:land",
            ],
        ),
        (
            "return from graveyard",
            &[
                "o:\"return target creature card from your graveyard\"",
            ],
        ),
        ("copy spells", &["o:\"copy target spell\""]),
        ("cost reduction", &["o:\"spells cost\""]),
        ("prevent attacks", &["o:\"can't attack\""]),
        (
            "when an opponent",
            &["o:\"whenever an opponent\""],
        ),
    ];

    for (phrase, fragments) in patterns {
        if remaining.contains(phrase) {
            for fragment in *fragments {
                if let Some(otag) = fragment.strip_prefix("otag:") {
                    if KNOWN_OTAGS.contains(otag) {
                        ir.push_tag((*fragment).to_string());
                    } else {
                        ir.warn(format!(
                            "oracle tag 'otag:{otag}' is not on the allowlist, using oracle-text fallback"
                        ));
                        ir.push_oracle(format!("o:\"{otag}\""));
                    }
                } else {
                    ir.push_oracle((*fragment).to_string());
                }
            }
            *remaining = remaining.replacen(phrase, "", 1);
        }
    }
}

/// Stage 13: targeting patterns — must run before type parsing so that
/// "destroy creature" doesn't leave a bare "creature" for the type stage
/// to misread as `t:creature`.
pub fn apply_targeting(ir: &mut SearchIr, remaining: &mut String) {
    for entry in TARGETING_TABLE.iter() {
        for verb in entry.verbs {
            let phrase = format!("{verb} creature");
            if remaining.contains(phrase.as_str()) {
                match entry.otag {
                    Some(otag) if KNOWN_OTAGS.contains(otag) => {
                        ir.push_tag(format!("otag:{otag}"));
                    }
                    Some(otag) => {
                        ir.warn(format!(
                            "oracle tag 'otag:{otag}' is not on the allowlist, using oracle-text fallback"
                        ));
                        ir.push_oracle(entry.fallback.to_string());
                    }
                    None => {
                        ir.push_oracle(entry.fallback.to_string());
                    }
                }
                *remaining = remaining.replacen(phrase.as_str(), "", 1);
            }
        }
    }
}
