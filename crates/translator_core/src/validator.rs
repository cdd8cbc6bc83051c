//! Validator and auto-corrector. Guards both deterministic and
//! LLM-produced queries: known-key allowlists, quote/paren/brace
//! balancing, oracle-tag allowlist, boolean-precedence normalization, and
//! verbose-phrase simplification.

use crate::tables::search_keys::VALID_SEARCH_KEYS;
use crate::tables::tags::KNOWN_OTAGS;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub sanitized: String,
    pub issues: Vec<String>,
}

const MAX_QUERY_LEN: usize = 400;

/// Sanitizes a query string and reports what was changed along the way.
pub fn validate(query: &str) -> ValidationResult {
    let mut issues = Vec::new();
    let mut q = normalize_whitespace(query);

    q = normalize_or_groups(&q, &mut issues);

    if q.len() > MAX_QUERY_LEN {
        q.truncate(MAX_QUERY_LEN);
        issues.push(format!("query truncated to {MAX_QUERY_LEN} characters"));
    }

    q = strip_disallowed_characters(&q, &mut issues);
    q = rewrite_e_year(&q, &mut issues);
    q = drop_power_toughness_arithmetic(&q, &mut issues);
    q = balance_curly_braces(&q, &mut issues);
    q = drop_unknown_keys(&q, &mut issues);
    q = drop_unknown_otags(&q, &mut issues);
    q = strip_unbalanced_parens(&q, &mut issues);
    q = balance_quotes(&q, &mut issues);

    ValidationResult { sanitized: normalize_whitespace(&q), issues }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokenise respecting quoted strings, track paren depth, and at depth 0
/// wrap a bare `OR` and its operands in parentheses so Scryfall's
/// low-precedence implicit-AND doesn't accidentally capture the
/// OR-operands.
fn normalize_or_groups(query: &str, issues: &mut Vec<String>) -> String {
    let tokens = tokenize_respecting_quotes(query);
    let mut out: Vec<String> = Vec::new();
    let mut depth = 0i32;
    let mut i = 0;
    let mut changed = false;

    while i < tokens.len() {
        let tok = &tokens[i];
        depth += paren_delta(tok);

        if depth == 0 && tok.eq_ignore_ascii_case("or") && !out.is_empty() {
            let left = out.pop().unwrap();
            let mut group = vec![left, "or".to_string()];
            i += 1;
            while i < tokens.len() {
                let next = &tokens[i];
                if next.eq_ignore_ascii_case("or") {
                    group.push("or".to_string());
                    i += 1;
                    continue;
                }
                group.push(next.clone());
                i += 1;
                // Stop grouping once the next token isn't chained by
                // another "or".
                if i >= tokens.len() || !tokens[i].eq_ignore_ascii_case("or") {
                    break;
                }
            }
            out.push(format!("({})", group.join(" ")));
            changed = true;
            continue;
        }

        out.push(tok.clone());
        i += 1;
    }

    if changed {
        issues.push("normalized OR group with parentheses".to_string());
    }
    out.join(" ")
}

fn paren_delta(tok: &str) -> i32 {
    tok.matches('(').count() as i32 - tok.matches(')').count() as i32
}

fn tokenize_respecting_quotes(query: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in query.chars() {
        match c {
            '"' => {
                current.push(c);
                in_quotes = !in_quotes;
            }
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn strip_disallowed_characters(query: &str, issues: &mut Vec<String>) -> String {
    static ALLOWED: LazyLock<Regex> = LazyLock::new(|| {
        // Preserve Scryfall-meaningful punctuation, including regex
        // metacharacters used inside `o:/.../ ` fragments.
        Regex::new(r#"[^\w\s:<>=!"'(){}\[\]/.,\-+*^$|\\]"#).unwrap()
    });
    if ALLOWED.is_match(query) {
        issues.push("stripped disallowed characters".to_string());
    }
    ALLOWED.replace_all(query, "").to_string()
}

fn rewrite_e_year(query: &str, issues: &mut Vec<String>) -> String {
    static E_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\be:(\d{4})\b").unwrap());
    if E_YEAR.is_match(query) {
        issues.push("rewrote e:YYYY to year=YYYY".to_string());
    }
    E_YEAR.replace_all(query, "year=$1").to_string()
}

fn drop_power_toughness_arithmetic(query: &str, issues: &mut Vec<String>) -> String {
    static ARITH: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(?:pow|tou)[+\-]\d+\b").unwrap());
    if ARITH.is_match(query) {
        issues.push("dropped unsupported power/toughness arithmetic".to_string());
    }
    ARITH.replace_all(query, "").to_string()
}

fn balance_curly_braces(query: &str, issues: &mut Vec<String>) -> String {
    let open = query.matches('{').count();
    let close = query.matches('}').count();
    if open == close {
        return query.to_string();
    }
    issues.push("balanced curly braces".to_string());
    let mut q = query.to_string();
    if open > close {
        q.push_str(&"}".repeat(open - close));
    } else {
        // Drop excess closing braces from the end.
        for _ in 0..(close - open) {
            if let Some(pos) = q.rfind('}') {
                q.remove(pos);
            }
        }
    }
    q
}

/// Scan every `KEY:`/`KEY=`/`KEY<`/`KEY>` and drop tokens whose key is not
/// in `ValidSearchKeys`.
fn drop_unknown_keys(query: &str, issues: &mut Vec<String>) -> String {
    static KEY_TOKEN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"^-?(\w+)[:=<>]"#).unwrap());

    let tokens = tokenize_respecting_quotes(query);
    let mut dropped = false;
    let kept: Vec<String> = tokens
        .into_iter()
        .filter(|tok| {
            let bare = tok.trim_start_matches('(').trim_end_matches(')');
            if let Some(caps) = KEY_TOKEN.captures(bare) {
                let key = caps[1].to_lowercase();
                if !VALID_SEARCH_KEYS.contains(key.as_str()) {
                    dropped = true;
                    return false;
                }
            }
            true
        })
        .collect();

    if dropped {
        issues.push("dropped tokens with unknown search keys".to_string());
    }
    repair_orphan_booleans(&kept.join(" "))
}

/// Scan every `otag:X` and drop tokens whose tag is not in `KnownOtags`.
fn drop_unknown_otags(query: &str, issues: &mut Vec<String>) -> String {
    static OTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^otag:(\S+)$").unwrap());

    let tokens = tokenize_respecting_quotes(query);
    let mut dropped = false;
    let kept: Vec<String> = tokens
        .into_iter()
        .filter(|tok| {
            if let Some(caps) = OTAG.captures(tok.as_str()) {
                if !KNOWN_OTAGS.contains(&caps[1]) {
                    dropped = true;
                    return false;
                }
            }
            true
        })
        .collect();

    if dropped {
        issues.push("dropped unknown oracle tags".to_string());
    }
    repair_orphan_booleans(&kept.join(" "))
}

/// After dropping a token, a bare `OR`/`AND` may be left dangling next to
/// another boolean operator (e.g. "t:creature or or t:goblin"). Collapse
/// consecutive/orphaned boolean operators.
fn repair_orphan_booleans(query: &str) -> String {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    let mut out: Vec<&str> = Vec::new();
    for tok in tokens {
        let is_bool = tok.eq_ignore_ascii_case("or") || tok.eq_ignore_ascii_case("and");
        if is_bool {
            match out.last() {
                None => continue,
                Some(prev) if prev.eq_ignore_ascii_case("or") || prev.eq_ignore_ascii_case("and") => {
                    continue;
                }
                _ => {}
            }
        }
        out.push(tok);
    }
    while matches!(out.last(), Some(t) if t.eq_ignore_ascii_case("or") || t.eq_ignore_ascii_case("and"))
    {
        out.pop();
    }
    out.join(" ")
}

fn strip_unbalanced_parens(query: &str, issues: &mut Vec<String>) -> String {
    let mut depth = 0i32;
    let mut out = String::with_capacity(query.len());
    let mut in_quotes = false;
    let mut changed = false;

    for c in query.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        }
        if !in_quotes && c == '(' {
            depth += 1;
        } else if !in_quotes && c == ')' {
            if depth == 0 {
                changed = true;
                continue; // drop unmatched close paren
            }
            depth -= 1;
        }
        out.push(c);
    }
    if depth > 0 {
        changed = true;
        out.push_str(&")".repeat(depth as usize));
    }
    if changed {
        issues.push("balanced parentheses".to_string());
    }
    out
}

fn balance_quotes(query: &str, issues: &mut Vec<String>) -> String {
    let mut q = query.to_string();
    if q.matches('"').count() % 2 != 0 {
        q.push('"');
        issues.push("appended closing double quote".to_string());
    }
    // Count single quotes that aren't apostrophes inside a word, since
    // Scryfall only treats a bare `'` as a delimiter there.
    let count = count_delimiter_single_quotes(&q);
    if count % 2 != 0 {
        q.push('\'');
        issues.push("appended closing single quote".to_string());
    }
    q
}

fn count_delimiter_single_quotes(s: &str) -> usize {
    let chars: Vec<char> = s.chars().collect();
    let mut count = 0;
    for (i, &c) in chars.iter().enumerate() {
        if c != '\'' {
            continue;
        }
        let prev_is_alnum = i > 0 && chars[i - 1].is_alphanumeric();
        let next_is_alnum = i + 1 < chars.len() && chars[i + 1].is_alphanumeric();
        if prev_is_alnum && next_is_alnum {
            continue; // apostrophe inside a word, e.g. "Urza's"
        }
        count += 1;
    }
    count
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityFlag {
    UnnecessaryGameFilter,
    VerbosePhrase(String),
    LongOracleText,
    DeeplyNestedParens,
    UnnecessaryQuotes,
}

/// Scans a sanitized query for stylistic issues worth auto-correcting.
pub fn detect_quality_flags(query: &str) -> Vec<QualityFlag> {
    let mut flags = Vec::new();

    if query.contains("game:paper") {
        flags.push(QualityFlag::UnnecessaryGameFilter);
    }

    for verbose in ["enters the battlefield", "leaves the battlefield", "when this creature dies"] {
        if query.contains(verbose) {
            flags.push(QualityFlag::VerbosePhrase(verbose.to_string()));
        }
    }

    static ORACLE_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"o:"([^"]+)""#).unwrap());
    for caps in ORACLE_TEXT.captures_iter(query) {
        if caps[1].len() > 50 {
            flags.push(QualityFlag::LongOracleText);
        }
    }

    if query.contains("(((") {
        flags.push(QualityFlag::DeeplyNestedParens);
    }

    static SINGLE_WORD_QUOTE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#""(\w+)""#).unwrap());
    if SINGLE_WORD_QUOTE.is_match(query) {
        flags.push(QualityFlag::UnnecessaryQuotes);
    }

    flags
}

#[derive(Debug, Clone)]
pub struct CorrectionResult {
    pub corrected: String,
    pub corrections: Vec<String>,
}

/// Rewrites a query to resolve the given quality flags, recording each
/// change made.
pub fn apply_auto_corrections(query: &str, flags: &[QualityFlag]) -> CorrectionResult {
    let mut q = query.to_string();
    let mut corrections = Vec::new();

    static FUNCTION_PREFIX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\bfunction:").unwrap());
    static ORACLETAG_PREFIX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\boracletag:").unwrap());
    if FUNCTION_PREFIX.is_match(&q) {
        q = FUNCTION_PREFIX.replace_all(&q, "otag:").to_string();
        corrections.push("normalized function: to otag:".to_string());
    }
    if ORACLETAG_PREFIX.is_match(&q) {
        q = ORACLETAG_PREFIX.replace_all(&q, "otag:").to_string();
        corrections.push("normalized oracletag: to otag:".to_string());
    }

    for flag in flags {
        match flag {
            QualityFlag::UnnecessaryGameFilter => {
                q = q.replace("game:paper", "").trim().to_string();
                corrections.push("removed unnecessary game:paper filter".to_string());
            }
            QualityFlag::VerbosePhrase(phrase) => {
                let short = match phrase.as_str() {
                    "enters the battlefield" => "enters",
                    "leaves the battlefield" => "leaves",
                    "when this creature dies" => "dies",
                    other => other,
                };
                q = q.replace(phrase.as_str(), short);
                corrections.push(format!("shortened '{phrase}' to '{short}'"));
            }
            QualityFlag::LongOracleText
            | QualityFlag::DeeplyNestedParens
            | QualityFlag::UnnecessaryQuotes => {
                // Surfaced as an assumption but not mechanically corrected.
            }
        }
    }

    static EMPTY_PARENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*\)").unwrap());
    if EMPTY_PARENS.is_match(&q) {
        q = EMPTY_PARENS.replace_all(&q, "").to_string();
        corrections.push("removed empty parentheses".to_string());
    }

    CorrectionResult {
        corrected: normalize_whitespace(&q),
        corrections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_unbalanced_parens_and_quotes() {
        let result = validate("t:creature o:\"draw");
        assert_eq!(result.sanitized, "t:creature o:\"draw\"");
    }

    #[test]
    fn drops_unknown_keys() {
        let result = validate("foo:bar t:creature");
        assert_eq!(result.sanitized, "t:creature");
    }

    #[test]
    fn unknown_tag_stripping_repairs_orphan_or() {
        let result = validate("t:creature or otag:doesnotexist or t:goblin");
        assert!(!result.sanitized.contains("or or"));
        assert!(result.sanitized.contains("t:creature"));
        assert!(result.sanitized.contains("t:goblin"));
    }

    #[test]
    fn validate_is_idempotent_on_already_sanitized_input() {
        let once = validate("t:creature c:r mv<=3");
        let twice = validate(&once.sanitized);
        assert_eq!(once.sanitized, twice.sanitized);
    }

    #[test]
    fn e_year_is_rewritten() {
        let result = validate("e:2020");
        assert_eq!(result.sanitized, "year=2020");
    }

    #[test]
    fn verbose_phrase_is_shortened() {
        let flags = detect_quality_flags("o:\"enters the battlefield\"");
        let corrected = apply_auto_corrections("o:\"enters the battlefield\"", &flags);
        assert!(corrected.corrected.contains("enters"));
        assert!(!corrected.corrected.contains("enters the battlefield"));
    }

    #[test]
    fn function_prefix_normalizes_to_otag() {
        let flags = detect_quality_flags("function:ramp");
        let corrected = apply_auto_corrections("function:ramp", &flags);
        assert_eq!(corrected.corrected, "otag:ramp");
    }
}
