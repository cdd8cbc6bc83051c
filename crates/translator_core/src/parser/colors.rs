//! Stage 14: color/identity disambiguation.

use crate::ir::{Color, ColorConstraint, ColorMode, ColorOperator, NumericConstraint, NumericField, NumericOp, SearchIr};
use crate::tables::colors::{color_letters, COLOR_MAP};

fn identity_context(remaining: &str, ir: &SearchIr) -> bool {
    remaining.contains("ci ")
        || remaining.contains(" ci")
        || remaining.contains("color identity")
        || remaining.contains("commander deck")
        || remaining.contains("can go in")
        || remaining.contains("fits into")
        || ir.specials.iter().any(|s| s == "f:commander" || s == "is:commander")
}

/// Stage 14: mono-X, guild names, "X or Y", "X and Y", hyphenated pairs,
/// bare color words.
pub fn apply_colors(ir: &mut SearchIr, remaining: &mut String) {
    // "multicolor"/"multicolored" is a color-count constraint, not a
    // color-constraint, and is independent of the mono/guild/bare-color
    // stages below.
    if remaining.contains("multicolor") {
        ir.color_count_constraint = Some(NumericConstraint {
            field: NumericField::ColorIdentityCount,
            op: NumericOp::Gt,
            value: "1".to_string(),
        });
        *remaining = remaining.replace("multicolored", "").replace("multicolor", "");
    }

    // mono-X sets monoColor, mutually exclusive with colorConstraint.
    for (name, color) in COLOR_MAP.iter() {
        let phrase = format!("mono-{name}");
        let phrase_space = format!("mono {name}");
        if remaining.contains(phrase.as_str()) || remaining.contains(phrase_space.as_str()) {
            ir.mono_color = Some(*color);
            *remaining = remaining.replace(phrase.as_str(), "").replace(phrase_space.as_str(), "");
            return;
        }
    }

    // Guild/shard/wedge names.
    let guild_names: Vec<&'static str> = crate::tables::colors::MULTICOLOR_MAP
        .keys()
        .copied()
        .collect();
    for name in guild_names {
        if remaining.contains(name) {
            if let Some(letters) = color_letters(name) {
                let values: Vec<Color> = letters
                    .chars()
                    .filter_map(|c| COLOR_MAP.values().find(|col| col.as_letter() == c).copied())
                    .collect();
                let identity = identity_context(remaining, ir);
                ir.color_constraint = Some(ColorConstraint {
                    values,
                    mode: if identity { ColorMode::Identity } else { ColorMode::Color },
                    operator: ColorOperator::Exact,
                });
                *remaining = remaining.replacen(name, "", 1);
                return;
            }
        }
    }

    // Collect explicit color words present in the text (longest names
    // first, to avoid "u" falsely matching inside another word).
    let mut found: Vec<(Color, &'static str)> = Vec::new();
    let mut names: Vec<&'static str> = COLOR_MAP.keys().copied().filter(|n| n.len() > 1).collect();
    names.sort_by_key(|n| std::cmp::Reverse(n.len()));
    for name in names {
        let color = COLOR_MAP[name];
        let bounded = format!(" {name} ");
        let padded = format!(" {remaining} ");
        if padded.contains(bounded.as_str()) && !found.iter().any(|(c, _)| *c == color) {
            found.push((color, name));
        }
    }

    if found.is_empty() {
        return;
    }

    let identity = identity_context(remaining, ir);
    let exactness = remaining.contains("exactly")
        || remaining.contains("only")
        || remaining.contains("just");
    let is_or = remaining.contains(" or ");
    let is_and = remaining.contains(" and ") || remaining.contains('-');

    let operator = if exactness {
        ColorOperator::Exact
    } else if is_or {
        ColorOperator::Or
    } else if identity && is_and {
        ColorOperator::Within
    } else {
        ColorOperator::And
    };

    let values: Vec<Color> = found.iter().map(|(c, _)| *c).collect();
    ir.color_constraint = Some(ColorConstraint {
        values,
        mode: if identity { ColorMode::Identity } else { ColorMode::Color },
        operator,
    });

    for (_, name) in &found {
        *remaining = remaining.replacen(name, "", 1);
    }
}
