//! Deterministic parser: an ordered cascade of
//! sub-parsers, each consuming text it recognises from `remaining` and
//! appending to a shared `SearchIr`.
//!
//! Modeled after `detect_query_intent` in `scryfall/smart.rs` (a single
//! function walking an ordered list of pattern checks, returning early
//! on the first confident match), generalized here to an ordered
//! *cascade* of mutating stages rather than a single early-return
//! classifier.

mod card_name;
mod cleanup;
mod colors;
mod exclusions_companions;
mod keywords_archetypes;
mod mana_price_numeric;
mod slang_cards_like;
mod special_oracle_targeting;
mod tags_tokens_enablers;
mod types;

use crate::ir::SearchIr;
use crate::normalizer::normalize;

/// A fully-built IR plus whatever text the cascade could not place. The
/// residual triggers LLM fallback in the orchestrator when non-empty.
pub struct BuiltIr {
    pub ir: SearchIr,
    pub remaining: String,
}

/// Result of running the deterministic parser: either a card-name
/// short-circuit query (empty IR, bypassing every later stage) or a
/// built `SearchIr` with its residual text.
pub enum ParseOutcome {
    ShortCircuit(String),
    Ir(BuiltIr),
}

/// Drive the ordered cascade of parser stages end to end.
pub fn build_ir(raw_query: &str) -> ParseOutcome {
    let normalized = normalize(raw_query);

    // Stage 1: card-name short-circuit.
    if let Some(query) = card_name::try_card_name_short_circuit(&normalized, raw_query) {
        return ParseOutcome::ShortCircuit(query);
    }

    let mut ir = SearchIr::new();
    let mut remaining = normalized;

    // Stages 2-3.
    slang_cards_like::apply_slang(&mut ir, &mut remaining);
    slang_cards_like::apply_cards_like(&mut ir, &mut remaining);

    // Stage 4 (plus the art-tag table, which shares its shape).
    tags_tokens_enablers::apply_tag_first(&mut ir, &mut remaining);
    tags_tokens_enablers::apply_art_tags(&mut ir, &mut remaining);
    // Stages 5-6.
    tags_tokens_enablers::apply_token_creation(&mut ir, &mut remaining);
    tags_tokens_enablers::apply_enablers(&mut ir, &mut remaining);

    // Stages 7-8.
    keywords_archetypes::apply_keywords(&mut ir, &mut remaining);
    keywords_archetypes::apply_archetypes(&mut ir, &mut remaining);

    // Stages 9-10.
    exclusions_companions::apply_exclusions(&mut ir, &mut remaining);
    exclusions_companions::apply_companions(&mut ir, &mut remaining);

    // Stages 11-13.
    special_oracle_targeting::apply_special_patterns(&mut ir, &mut remaining);
    special_oracle_targeting::apply_oracle_patterns(&mut ir, &mut remaining);
    special_oracle_targeting::apply_targeting(&mut ir, &mut remaining);

    // Stage 14.
    colors::apply_colors(&mut ir, &mut remaining);

    // Stages 15-17.
    types::apply_types(&mut ir, &mut remaining);
    types::apply_supertypes_subtypes(&mut ir, &mut remaining);
    types::apply_post_type_correction(&mut ir);

    // Stages 18-19.
    mana_price_numeric::apply_mana_and_equipment(&mut ir, &mut remaining);
    mana_price_numeric::apply_price_heuristics(&mut ir, &mut remaining);

    // Stages 20-21.
    mana_price_numeric::apply_numeric_constraints(&mut ir, &mut remaining);
    mana_price_numeric::apply_year_phrases(&mut ir, &mut remaining);

    // Stage 22.
    cleanup::cleanup_residual(&mut remaining);

    ParseOutcome::Ir(BuiltIr { ir, remaining })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_name_short_circuits() {
        match build_ir("Gray Merchant of Asphodel") {
            ParseOutcome::ShortCircuit(q) => {
                assert_eq!(q, "!\"Gray Merchant of Asphodel\"");
            }
            ParseOutcome::Ir(_) => panic!("expected short circuit"),
        }
    }

    #[test]
    fn mono_red_creatures_builds_ir() {
        match build_ir("mono red creatures") {
            ParseOutcome::Ir(built) => {
                assert!(built.ir.mono_color.is_some());
                assert!(built.ir.types.contains(&"creature".to_string()));
            }
            ParseOutcome::ShortCircuit(_) => panic!("did not expect short circuit"),
        }
    }
}
