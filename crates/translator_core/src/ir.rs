//! `SearchIr`: the intermediate representation threaded through the parser
//! cascade and consumed by the renderer.
//!
//! Shaped like a small plain struct mutated by `&mut self` methods (in
//! the manner of `ScryfallClientBuilder`) rather than a trait object per
//! stage: a plain mutable struct passed by exclusive reference, with the
//! residual text threaded alongside it.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    W,
    U,
    B,
    R,
    G,
    C,
}

impl Color {
    pub fn as_letter(self) -> char {
        match self {
            Color::W => 'w',
            Color::U => 'u',
            Color::B => 'b',
            Color::R => 'r',
            Color::G => 'g',
            Color::C => 'c',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Color,
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOperator {
    Or,
    And,
    Exact,
    Within,
    Include,
}

#[derive(Debug, Clone)]
pub struct ColorConstraint {
    pub values: Vec<Color>,
    pub mode: ColorMode,
    pub operator: ColorOperator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Mv,
    Pow,
    Tou,
    Year,
    Usd,
    Prints,
    ColorIdentityCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl NumericOp {
    pub fn as_str(self) -> &'static str {
        match self {
            NumericOp::Eq => "=",
            NumericOp::Lt => "<",
            NumericOp::Lte => "<=",
            NumericOp::Gt => ">",
            NumericOp::Gte => ">=",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NumericConstraint {
    pub field: NumericField,
    pub op: NumericOp,
    /// Scryfall accepts both numeric and field-relative comparisons
    /// (e.g. `pow>tou`); kept as a string so either renders verbatim.
    pub value: String,
}

/// The central mutable structure built by the parser and consumed by the
/// renderer.
#[derive(Debug, Clone, Default)]
pub struct SearchIr {
    pub mono_color: Option<Color>,
    pub color_constraint: Option<ColorConstraint>,
    pub color_count_constraint: Option<NumericConstraint>,

    pub types: Vec<String>,
    pub subtypes: Vec<String>,
    pub excluded_types: Vec<String>,

    pub numeric: Vec<NumericConstraint>,

    pub tags: Vec<String>,
    pub art_tags: Vec<String>,
    pub oracle: Vec<String>,
    pub specials: Vec<String>,

    pub warnings: Vec<String>,

    /// Types already consumed inside an OR-group in `specials`; the
    /// renderer must not also emit them as AND-entries (invariant 2).
    pub or_group_types: BTreeSet<String>,
}

impl SearchIr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_type(&mut self, t: impl Into<String>) {
        let t = t.into();
        if !self.types.contains(&t) {
            self.types.push(t);
        }
    }

    pub fn push_subtype(&mut self, t: impl Into<String>) {
        let t = t.into();
        if !self.subtypes.contains(&t) {
            self.subtypes.push(t);
        }
    }

    pub fn push_excluded_type(&mut self, t: impl Into<String>) {
        let t = t.into();
        if !self.excluded_types.contains(&t) {
            self.excluded_types.push(t);
        }
    }

    pub fn push_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn push_art_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.art_tags.contains(&tag) {
            self.art_tags.push(tag);
        }
    }

    pub fn push_oracle(&mut self, frag: impl Into<String>) {
        let frag = frag.into();
        if !self.oracle.contains(&frag) {
            self.oracle.push(frag);
        }
    }

    pub fn push_special(&mut self, frag: impl Into<String>) {
        let frag = frag.into();
        if !self.specials.contains(&frag) {
            self.specials.push(frag);
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Push a numeric constraint, deduplicating on `(field, op)` per
    /// invariant 4 — the first match for a given (field, op) wins.
    pub fn push_numeric(&mut self, constraint: NumericConstraint) {
        if self
            .numeric
            .iter()
            .any(|c| c.field == constraint.field && c.op == constraint.op)
        {
            return;
        }
        self.numeric.push(constraint);
    }

    /// Invariant 1: exactly one color specifier.
    pub fn has_color_specifier(&self) -> bool {
        self.mono_color.is_some() || self.color_constraint.is_some()
    }
}
