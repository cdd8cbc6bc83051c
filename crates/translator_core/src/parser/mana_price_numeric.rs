//! Stages 18-21: mana production/equipment, price heuristics, numeric
//! constraints, and year phrases.

use crate::ir::{NumericConstraint, NumericField, NumericOp, SearchIr};
use regex::Regex;
use std::sync::LazyLock;

/// Stage 18: "produces two mana" / "equip N".
pub fn apply_mana_and_equipment(ir: &mut SearchIr, remaining: &mut String) {
    if remaining.contains("produces two mana") || remaining.contains("produces 2 mana") {
        ir.push_oracle("o:/\\{[WUBRG]\\}.*\\{[WUBRG]\\}/".to_string());
        if !remaining.contains("land") {
            ir.push_excluded_type("land");
        }
        *remaining = remaining.replace("produces two mana", "").replace("produces 2 mana", "");
    }

    static EQUIP_LEQ: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"equip (\d+) or less").unwrap());
    static EQUIP_EXACT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"equip (\d+)").unwrap());

    if let Some(caps) = EQUIP_LEQ.captures(remaining) {
        let n = &caps[1];
        ir.push_oracle(format!("o:/Equip [0-{n}]/"));
        *remaining = EQUIP_LEQ.replace(remaining, "").to_string();
    } else if let Some(caps) = EQUIP_EXACT.captures(remaining) {
        let n = &caps[1];
        ir.push_oracle(format!("o:\"Equip {n}\""));
        *remaining = EQUIP_EXACT.replace(remaining, "").to_string();
    }
}

/// Stage 19: price heuristics.
pub fn apply_price_heuristics(ir: &mut SearchIr, remaining: &mut String) {
    static UNDER_DOLLAR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"under \$(\d+(?:\.\d+)?)").unwrap());
    static REPRINT_COUNT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"more than (\d+) reprints?").unwrap());

    if let Some(caps) = UNDER_DOLLAR.captures(remaining) {
        let value = caps[1].to_string();
        ir.push_numeric(NumericConstraint {
            field: NumericField::Usd,
            op: NumericOp::Lt,
            value,
        });
        *remaining = UNDER_DOLLAR.replace(remaining, "").to_string();
    } else if !remaining.contains('$')
        && (remaining.contains("cheap") || remaining.contains("budget") || remaining.contains("inexpensive"))
    {
        ir.push_numeric(NumericConstraint {
            field: NumericField::Mv,
            op: NumericOp::Lte,
            value: "3".to_string(),
        });
        *remaining = remaining
            .replace("cheap", "")
            .replace("budget", "")
            .replace("inexpensive", "");
    }

    if let Some(caps) = REPRINT_COUNT.captures(remaining) {
        let value = caps[1].to_string();
        ir.push_numeric(NumericConstraint {
            field: NumericField::Prints,
            op: NumericOp::Gt,
            value,
        });
        *remaining = REPRINT_COUNT.replace(remaining, "").to_string();
    }
}

struct NumericTemplate {
    regex: Regex,
    op: NumericOp,
    /// Capture group index holding the numeric value.
    value_group: usize,
}

fn templates_for(field_word: &str) -> Vec<NumericTemplate> {
    let fw = regex::escape(field_word);
    vec![
        NumericTemplate {
            regex: Regex::new(&format!(r"at least (\d+) {fw}")).unwrap(),
            op: NumericOp::Gte,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"(\d+)\+ ?{fw}")).unwrap(),
            op: NumericOp::Gte,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"(\d+) {fw} or more")).unwrap(),
            op: NumericOp::Gte,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"{fw} (\d+) or more")).unwrap(),
            op: NumericOp::Gte,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"at most (\d+) {fw}")).unwrap(),
            op: NumericOp::Lte,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"(\d+) {fw} or less")).unwrap(),
            op: NumericOp::Lte,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"under (\d+) {fw}")).unwrap(),
            op: NumericOp::Lt,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"over (\d+) {fw}")).unwrap(),
            op: NumericOp::Gt,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"exactly (\d+) {fw}")).unwrap(),
            op: NumericOp::Eq,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"(\d+) {fw}")).unwrap(),
            op: NumericOp::Eq,
            value_group: 1,
        },
        NumericTemplate {
            regex: Regex::new(&format!(r"{fw} (\d+)")).unwrap(),
            op: NumericOp::Eq,
            value_group: 1,
        },
    ]
}

/// Stage 20: shared numeric extractor for mv/pow/tou/year, tried in
/// order of specificity; the first match for each field wins.
pub fn apply_numeric_constraints(ir: &mut SearchIr, remaining: &mut String) {
    let fields = [
        (NumericField::Mv, "mv"),
        (NumericField::Pow, "pow"),
        (NumericField::Tou, "tou"),
        (NumericField::Year, "year"),
    ];

    // "power greater than toughness" style field-relative comparison,
    // handled before the numeric templates so "power" isn't consumed as
    // a bare numeric-field word first.
    if remaining.contains("power greater than toughness") {
        ir.push_numeric(NumericConstraint {
            field: NumericField::Pow,
            op: NumericOp::Gt,
            value: "tou".to_string(),
        });
        *remaining = remaining.replacen("power greater than toughness", "", 1);
    }

    for (field, word) in fields {
        for template in templates_for(word) {
            if let Some(caps) = template.regex.captures(remaining) {
                if let Ok(_n) = caps[template.value_group].parse::<i64>() {
                    let value = caps[template.value_group].to_string();
                    ir.push_numeric(NumericConstraint {
                        field,
                        op: template.op,
                        value,
                    });
                    *remaining = template.regex.replace(remaining, "").to_string();
                    break;
                }
                // Malformed numeric constraints are silently dropped.
            }
        }
    }
}

/// Stage 21: year phrases ("after 2020", "since 2018").
pub fn apply_year_phrases(ir: &mut SearchIr, remaining: &mut String) {
    static AFTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"after (\d{4})").unwrap());
    static SINCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"since (\d{4})").unwrap());

    if let Some(caps) = AFTER.captures(remaining) {
        ir.push_numeric(NumericConstraint {
            field: NumericField::Year,
            op: NumericOp::Gt,
            value: caps[1].to_string(),
        });
        *remaining = AFTER.replace(remaining, "").to_string();
    } else if let Some(caps) = SINCE.captures(remaining) {
        ir.push_numeric(NumericConstraint {
            field: NumericField::Year,
            op: NumericOp::Gte,
            value: caps[1].to_string(),
        });
        *remaining = SINCE.replace(remaining, "").to_string();
    }
}
