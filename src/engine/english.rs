//! Recognizer backed by the `chrono-english` grammar.
//!
//! `chrono-english` resolves a complete expression ("next friday 8pm",
//! "3 hours ago") against a base time but has no notion of searching inside a
//! sentence. This recognizer supplies that part:
//!
//! ```text
//! input ── lexicon::words ──▶ [w0 w1 w2 ... wn]
//!                               │
//!            for each word that can START a phrase (left to right):
//!              try windows w[i..j], longest first (capped at MAX_WINDOW_WORDS),
//!              skipping windows whose last word cannot END a phrase
//!              first window the grammar accepts
//!                ──▶ shrink from the right while the instant stays the same
//!                ──▶ RawMatch, resume at the end of the shrunk window
//! ```
//!
//! The grammar quietly ignores trailing words it does not understand
//! ("3pm with 5 people" is 15:00), hence the shrinking step. Inner "at"
//! ("tomorrow at 3pm") is dropped from what the grammar sees but kept in
//! the reported phrase.
//!
//! Matches never overlap and come out in input order. The grammar has no
//! ranges, so `end` is always `Undefined`.

use super::lexicon::{self, Word, WordClass};
use super::raw::{RawMatch, RawValue};
use super::recognizer::Recognizer;
use crate::Instant;
use crate::error::{EngineError, Result};
use chrono::{FixedOffset, Local, TimeZone};
use log::{debug, trace};
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

/// Longest span (in words) submitted to the grammar.
pub const MAX_WINDOW_WORDS: usize = 6;

/// Date-writing convention used for ambiguous forms like "04/01/18" and for
/// "next friday".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Us,
    Uk,
}

impl From<Dialect> for chrono_english::Dialect {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Us => chrono_english::Dialect::Us,
            Dialect::Uk => chrono_english::Dialect::Uk,
        }
    }
}

/// Settings for the built-in English engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub dialect: Dialect,
}

#[derive(Debug)]
pub struct EnglishRecognizer {
    dialect: Dialect,
}

impl EnglishRecognizer {
    /// Create the recognizer and make sure the grammar answers.
    ///
    /// A probe expression must resolve, otherwise the engine is reported as
    /// unavailable.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let recognizer = EnglishRecognizer { dialect: config.dialect };

        let utc = FixedOffset::east_opt(0).ok_or_else(|| EngineError::Unavailable("invalid probe offset".into()))?;
        let probe_base = utc
            .with_ymd_and_hms(2016, 11, 20, 9, 41, 0)
            .single()
            .ok_or_else(|| EngineError::Unavailable("invalid probe reference".into()))?;

        if recognizer.resolve("2016-11-20", probe_base).is_none() {
            return Err(EngineError::Unavailable(format!(
                "chrono-english ({:?}) rejected the probe expression",
                recognizer.dialect
            )));
        }

        Ok(recognizer)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn resolve(&self, span: &str, now: Instant) -> Option<Instant> {
        let dialect: chrono_english::Dialect = self.dialect.into();
        // Large counts ("999999999 years") overflow inside the grammar.
        match panic::catch_unwind(AssertUnwindSafe(|| chrono_english::parse_date_string(span, now, dialect))) {
            Ok(resolved) => resolved.ok(),
            Err(_) => {
                debug!("[english] grammar panicked on {:?}", span);
                None
            }
        }
    }

    /// Resolve the window `words[i..j]`, if its last word can end a phrase.
    fn resolve_window(&self, text: &str, words: &[Word], i: usize, j: usize, now: Instant) -> Option<Instant> {
        let last = &words[j - 1];
        if last.is_empty() || !last.class.intersects(WordClass::ENDS) {
            return None;
        }
        let query = grammar_query(text, &words[i..j]);
        let resolved = self.resolve(&query, now);
        trace!("[english] window {:?} -> {:?}", query, resolved);
        resolved
    }

    /// Try every window starting at `words[i]`, longest first, then shrink
    /// the accepted one to the shortest window with the same instant.
    fn longest_window<'t>(&self, text: &'t str, words: &[Word], i: usize, now: Instant) -> Option<(usize, &'t str, Instant)> {
        let max = (i + MAX_WINDOW_WORDS).min(words.len());

        let (longest, instant) =
            (i + 1..=max).rev().find_map(|j| self.resolve_window(text, words, i, j, now).map(|instant| (j, instant)))?;

        let j = (i + 1..longest)
            .find(|&j| self.resolve_window(text, words, i, j, now) == Some(instant))
            .unwrap_or(longest);

        Some((j, &text[words[i].start..words[j - 1].end], instant))
    }
}

/// The text handed to the grammar for a window: the original span with any
/// inner "at" cut out.
fn grammar_query<'t>(text: &'t str, window: &[Word]) -> Cow<'t, str> {
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return Cow::Borrowed("");
    };
    let span = &text[first.start..last.end];
    let inner = window.len().saturating_sub(1);

    if !window[1..inner.max(1)].iter().any(|w| text[w.start..w.end].eq_ignore_ascii_case("at")) {
        return Cow::Borrowed(span);
    }

    let mut query = String::with_capacity(span.len());
    let mut cursor = first.start;
    for (k, word) in window.iter().enumerate() {
        if k == 0 || k == inner || !text[word.start..word.end].eq_ignore_ascii_case("at") {
            continue;
        }
        query.push_str(text[cursor..word.start].trim_end());
        query.push(' ');
        cursor = window[k + 1].start;
    }
    query.push_str(&text[cursor..last.end]);
    Cow::Owned(query)
}

impl Recognizer for EnglishRecognizer {
    fn name(&self) -> &str {
        match self.dialect {
            Dialect::Us => "chrono-english (us)",
            Dialect::Uk => "chrono-english (uk)",
        }
    }

    fn recognize(&mut self, text: &str, reference: Option<Instant>) -> Vec<RawMatch> {
        // Clock is read per call, never cached.
        let now = reference.unwrap_or_else(|| Local::now().fixed_offset());
        let words = lexicon::words(text);

        let mut matches = Vec::new();
        let mut i = 0;
        while i < words.len() {
            let word = &words[i];
            if word.is_empty() || !word.class.intersects(WordClass::STARTS) {
                i += 1;
                continue;
            }

            match self.longest_window(text, &words, i, now) {
                Some((next, span, start)) => {
                    matches.push(RawMatch {
                        index: RawValue::Number(word.char_start as f64),
                        text: RawValue::Text(span.to_string()),
                        reference: RawValue::Instant(now),
                        start: RawValue::Instant(start),
                        end: RawValue::Undefined,
                    });
                    i = next;
                }
                None => i += 1,
            }
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Instant {
        // Wednesday
        FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2018, 3, 21, 11, 0, 0).unwrap()
    }

    fn uk() -> EnglishRecognizer {
        EnglishRecognizer::new(&EngineConfig { dialect: Dialect::Uk }).unwrap()
    }

    fn instant(s: &str) -> Instant {
        chrono::DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn construction_probe_passes() {
        let us = EnglishRecognizer::new(&EngineConfig::default()).unwrap();
        assert_eq!(us.dialect(), Dialect::Us);
        assert_eq!(us.name(), "chrono-english (us)");
    }

    #[test]
    fn finds_phrase_at_end_of_sentence() {
        let mut r = uk();
        let found = r.recognize("lunch on friday", Some(base()));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, RawValue::Number(9.0));
        assert_eq!(found[0].text, RawValue::Text("friday".into()));
        assert_eq!(found[0].start, RawValue::Instant(instant("2018-03-23T00:00:00+00:00")));
        assert_eq!(found[0].reference, RawValue::Instant(base()));
        assert!(found[0].end.is_undefined());
    }

    #[test]
    fn prefers_longest_window_and_trims_punctuation() {
        let mut r = uk();
        let found = r.recognize("see you friday 8pm.", Some(base()));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, RawValue::Text("friday 8pm".into()));
        assert_eq!(found[0].start, RawValue::Instant(instant("2018-03-23T20:00:00+00:00")));
    }

    #[test]
    fn trailing_words_the_grammar_ignores_are_left_out() {
        let mut r = uk();
        let found = r.recognize("meet 3pm then dinner friday", Some(base()));

        assert_eq!(found[0].index, RawValue::Number(5.0));
        assert_eq!(found[0].text, RawValue::Text("3pm".into()));
        assert_eq!(found[0].start, RawValue::Instant(instant("2018-03-21T15:00:00+00:00")));

        let found = r.recognize("call at 3pm with 5 people", Some(base()));
        assert_eq!(found[0].text, RawValue::Text("3pm".into()));
    }

    #[test]
    fn inner_at_is_read_past() {
        let mut r = uk();
        let found = r.recognize("Let's meet tomorrow at 3pm", Some(base()));

        assert_eq!(found[0].index, RawValue::Number(11.0));
        assert_eq!(found[0].text, RawValue::Text("tomorrow at 3pm".into()));
        assert_eq!(found[0].start, RawValue::Instant(instant("2018-03-22T15:00:00+00:00")));
    }

    #[test]
    fn grammar_queries() {
        let query = |text: &str| grammar_query(text, &lexicon::words(text)).into_owned();

        assert_eq!(query("tomorrow at 3pm"), "tomorrow 3pm");
        assert_eq!(query("friday AT 8pm"), "friday 8pm");
        assert_eq!(query("friday 8pm"), "friday 8pm");
        assert_eq!(query("at 3pm"), "at 3pm");
        assert_eq!(query("3pm at"), "3pm at");
        assert_eq!(query(""), "");
    }

    #[test]
    fn grammar_overflow_is_no_match() {
        let mut r = uk();
        let found = r.recognize("in 999999999 years", Some(base()));
        assert!(found.iter().all(|m| m.text != RawValue::Text("999999999 years".into())));
    }

    #[test]
    fn nothing_to_find() {
        let mut r = uk();
        assert!(r.recognize("hello world", Some(base())).is_empty());
        assert!(r.recognize("", Some(base())).is_empty());
        assert!(r.recognize("   ", Some(base())).is_empty());
    }

    #[test]
    fn keeps_the_reference_offset() {
        let mut r = uk();
        let cst = FixedOffset::west_opt(6 * 3600).unwrap();
        let reference = cst.with_ymd_and_hms(2018, 3, 21, 11, 0, 0).unwrap();

        let found = r.recognize("friday 10:30", Some(reference));
        assert_eq!(found[0].start, RawValue::Instant(cst.with_ymd_and_hms(2018, 3, 23, 10, 30, 0).unwrap()));
    }

    #[test]
    fn without_reference_uses_the_clock() {
        let mut r = uk();
        let before = Local::now().fixed_offset();
        let found = r.recognize("friday", None);
        let after = Local::now().fixed_offset();

        match &found[0].reference {
            RawValue::Instant(now) => assert!(*now >= before && *now <= after),
            other => panic!("unexpected reference {other:?}"),
        }
    }
}
