//! Result normalizer.
//!
//! Turns the first [`RawMatch`] of a call (or nothing) into a [`ParsedResult`].
//! This is a pure function of `(input, raw match, vocabulary)`; nothing is
//! remembered between calls.
//!
//! ```text
//! RawMatch ──┬─ index ──────▶ fields::offset   ─┐
//!            ├─ text ───────▶ fields::phrase   ─┼─▶ offset kept only if the phrase sits there
//!            ├─ reference ──▶ fields::instant   │
//!            ├─ start ──────▶ fields::instant   │
//!            └─ end ────────▶ fields::instant   │
//!                                               ▼
//!                     ignored::ignored_text(input, phrase, offset)
//!                     interval = (start, end) when both exist
//! ```

#[path = "normalize/fields.rs"]
mod fields;
#[path = "normalize/ignored.rs"]
mod ignored;

pub use ignored::{Vocabulary, ignored_text};

use crate::api::ParsedResult;
use crate::engine::RawMatch;
use crate::Interval;
use log::debug;

/// Build the result for one call.
pub(crate) fn normalize(input: &str, raw: Option<RawMatch>, vocabulary: &Vocabulary) -> ParsedResult {
    let Some(raw) = raw else {
        return ParsedResult::unmatched(input);
    };

    let phrase = fields::phrase(&raw.text);
    let mut offset = fields::offset(&raw.index, input);

    if let (Some(at), Some(p)) = (offset, phrase.as_deref()) {
        if !fields::phrase_at(input, p, at) {
            debug!("[normalize] phrase {:?} not found at offset {}, dropping offset", p, at);
            offset = None;
        }
    }

    let ignored = phrase.as_deref().map(|p| ignored_text(input, p, offset, vocabulary));

    let start = fields::instant(&raw.start);
    let end = fields::instant(&raw.end);
    let interval = start.zip(end).map(|(start, end)| Interval::new(start, end));

    ParsedResult {
        input: input.to_string(),
        phrase_start: offset,
        time_phrase: phrase,
        ignored_text: ignored,
        reference: fields::instant(&raw.reference),
        start,
        end,
        interval,
    }
}
