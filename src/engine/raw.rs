//! Loosely typed engine output.
//!
//! Engines hand back values the way an embedded interpreter or a JSON peer
//! would: a field may be missing, hold a number where text was expected, or
//! carry a date in string form. Nothing here validates; that is the
//! normalizer's job (see `src/normalize/fields.rs`).

use crate::Instant;

/// One value read back from an engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    /// The engine did not provide the field.
    #[default]
    Undefined,
    Number(f64),
    Text(String),
    Instant(Instant),
    /// Something the engine returned that has no sensible reading here
    /// (booleans, nested objects...). Kept for logging only.
    Opaque(String),
}

impl RawValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, RawValue::Undefined)
    }
}

impl From<Option<Instant>> for RawValue {
    fn from(value: Option<Instant>) -> Self {
        value.map_or(RawValue::Undefined, RawValue::Instant)
    }
}

/// A single match as reported by an engine.
///
/// `index` is a character offset into the submitted text, `text` the matched
/// span, `reference` the "now" the engine resolved against, and `start`/`end`
/// the resolved bounds (`end` only for ranges).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawMatch {
    pub index: RawValue,
    pub text: RawValue,
    pub reference: RawValue,
    pub start: RawValue,
    pub end: RawValue,
}

impl RawMatch {
    /// Build a well-formed match for a single point in time.
    pub fn point(index: usize, text: impl Into<String>, reference: Instant, start: Instant) -> Self {
        RawMatch {
            index: RawValue::Number(index as f64),
            text: RawValue::Text(text.into()),
            reference: RawValue::Instant(reference),
            start: RawValue::Instant(start),
            end: RawValue::Undefined,
        }
    }

    /// Build a well-formed match for a range.
    pub fn range(index: usize, text: impl Into<String>, reference: Instant, start: Instant, end: Instant) -> Self {
        RawMatch { end: RawValue::Instant(end), ..RawMatch::point(index, text, reference, start) }
    }
}
