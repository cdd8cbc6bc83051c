//! Static mapping tables.
//!
//! Everything here is built once (via `std::sync::LazyLock`) and never
//! mutated afterwards, in the spirit of the fixed `valid_keywords` /
//! `corrections` arrays in `scryfall/smart.rs`, generalized here into
//! full `HashMap`/`HashSet` tables for O(1) lookup.

pub mod archetypes;
pub mod cards_like;
pub mod colors;
pub mod keywords;
pub mod numbers;
pub mod search_keys;
pub mod slang;
pub mod tags;
