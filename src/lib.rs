//! Pull the time phrase out of free-form text and resolve it.
//!
//! ```text
//! caller ── parse(text, reference?) ──▶ Engine::recognize   (src/engine)
//!                                          │ first RawMatch
//!                                          ▼
//!                                   normalize()              (src/normalize)
//!                                          │
//!                                          ▼
//!                                   ParsedResult (immutable snapshot)
//! ```
//!
//! Phrase recognition itself belongs to a pluggable [`Recognizer`]. The crate
//! owns the handle to it, reads back what it found and turns that into a
//! [`ParsedResult`].

use chrono::{DateTime, Duration, FixedOffset};

#[macro_use]
mod macros;
mod api;
pub mod engine;
mod error;
mod normalize;

pub use api::{
    Context, Options, ParseDetails, ParseResultVerbose, ParsedResult, extract_instant, extract_instant_at,
    extract_interval, extract_interval_at, parse, parse_at, parse_verbose_with, parse_with,
};
pub use engine::{Dialect, Engine, EngineConfig, ProcessConfig, RawMatch, RawValue, Recognizer};
pub use error::{EngineError, Result};
pub use normalize::{Vocabulary, ignored_text};

/// An absolute point in time, carrying the UTC offset it was resolved in.
pub type Instant = DateTime<FixedOffset>;

/// A resolved range. `start` and `end` are kept exactly as the engine
/// reported them, even when `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: Instant,
    pub end: Instant,
}

impl Interval {
    pub fn new(start: Instant, end: Instant) -> Self {
        Interval { start, end }
    }

    /// Signed length of the interval (negative for a reversed range).
    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }
}
