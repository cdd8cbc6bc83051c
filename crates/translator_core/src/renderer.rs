//! IR renderer: converts `SearchIr` to a Scryfall query
//! string with deduplication and OR-group awareness.

use crate::ir::{ColorMode, ColorOperator, SearchIr};
use std::collections::HashSet;

pub fn render(ir: &SearchIr) -> String {
    let mut tokens: Vec<String> = Vec::new();

    // 1-2: color specifier (invariant 1: exactly one of the two).
    if let Some(color) = ir.mono_color {
        let letter = color.as_letter();
        tokens.push(format!("c={letter}"));
        tokens.push(format!("id={letter}"));
    } else if let Some(cc) = &ir.color_constraint {
        tokens.push(render_color_constraint(cc));
    }

    // 3-4: types, excluding anything already covered by an OR-group.
    for t in &ir.types {
        if !ir.or_group_types.contains(t) {
            tokens.push(format!("t:{t}"));
        }
    }
    for t in &ir.subtypes {
        tokens.push(format!("t:{t}"));
    }
    for t in &ir.excluded_types {
        if !ir.or_group_types.contains(t) {
            tokens.push(format!("-t:{t}"));
        }
    }

    // 5: numeric constraints, no spaces around the operator.
    for n in &ir.numeric {
        let field = match n.field {
            crate::ir::NumericField::Mv => "mv",
            crate::ir::NumericField::Pow => "pow",
            crate::ir::NumericField::Tou => "tou",
            crate::ir::NumericField::Year => "year",
            crate::ir::NumericField::Usd => "usd",
            crate::ir::NumericField::Prints => "prints",
            crate::ir::NumericField::ColorIdentityCount => "id",
        };
        tokens.push(format!("{field}{}{}", n.op.as_str(), n.value));
    }

    // 6: color-count constraint.
    if let Some(ccc) = &ir.color_count_constraint {
        let field = if ccc.field == crate::ir::NumericField::ColorIdentityCount {
            "id"
        } else {
            "mv"
        };
        tokens.push(format!("{field}{}{}", ccc.op.as_str(), ccc.value));
    }

    // 7: tags, art-tags, specials, oracle fragments, in that order.
    tokens.extend(ir.tags.iter().cloned());
    tokens.extend(ir.art_tags.iter().cloned());
    tokens.extend(ir.specials.iter().cloned());
    tokens.extend(ir.oracle.iter().cloned());

    // 8: dedupe case-insensitively, preserving first-occurrence order.
    let mut seen: HashSet<String> = HashSet::new();
    let deduped: Vec<String> = tokens
        .into_iter()
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect();

    // 9: collapse whitespace.
    deduped.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn render_color_constraint(cc: &crate::ir::ColorConstraint) -> String {
    let letters: String = cc.values.iter().map(|c| c.as_letter()).collect();
    let prefix = match cc.mode {
        ColorMode::Color => "c",
        ColorMode::Identity => "id",
    };

    match cc.operator {
        ColorOperator::Or => {
            let parts: Vec<String> = cc
                .values
                .iter()
                .map(|c| format!("{prefix}:{}", c.as_letter()))
                .collect();
            format!("({})", parts.join(" or "))
        }
        ColorOperator::And => format!("{prefix}:{letters}"),
        ColorOperator::Exact => format!("{prefix}={letters}"),
        ColorOperator::Within => format!("{prefix}<={letters}"),
        ColorOperator::Include => format!("{prefix}>={letters}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Color;

    #[test]
    fn mono_color_emits_both_c_and_id() {
        let mut ir = SearchIr::new();
        ir.mono_color = Some(Color::R);
        ir.push_type("creature");
        let out = render(&ir);
        assert!(out.contains("c=r"));
        assert!(out.contains("id=r"));
        assert!(out.contains("t:creature"));
    }

    #[test]
    fn or_group_types_are_not_double_rendered() {
        let mut ir = SearchIr::new();
        ir.push_type("artifact");
        ir.or_group_types.insert("artifact".to_string());
        ir.push_special("(t:artifact or t:enchantment)");
        let out = render(&ir);
        assert_eq!(out.matches("t:artifact").count(), 1);
    }

    #[test]
    fn dedupe_is_case_insensitive_and_order_preserving() {
        let mut ir = SearchIr::new();
        ir.push_oracle("O:Draw");
        ir.push_oracle("o:draw");
        let out = render(&ir);
        assert_eq!(out.matches("draw").count() + out.matches("Draw").count(), 1);
    }

    #[test]
    fn numeric_has_no_spaces_around_operator() {
        let mut ir = SearchIr::new();
        ir.push_numeric(crate::ir::NumericConstraint {
            field: crate::ir::NumericField::Mv,
            op: crate::ir::NumericOp::Lte,
            value: "3".to_string(),
        });
        let out = render(&ir);
        assert_eq!(out, "mv<=3");
    }
}
