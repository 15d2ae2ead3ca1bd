use crate::engine::{self, Engine};
use crate::error::Result;
use crate::normalize::{Vocabulary, normalize};
use crate::{Instant, Interval};
use std::fmt;
use std::time::Duration;

/// Parsing context.
///
/// Holds the instant relative expressions ("tomorrow", "2 days ago") are
/// resolved against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    /// Reference instant. `None` means the wall clock at the time of each
    /// call, never a time captured earlier.
    pub reference: Option<Instant>,
}

impl Context {
    pub fn at(reference: Instant) -> Self {
        Context { reference: Some(reference) }
    }
}

/// Options that affect normalization.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Words stripped from the ignored text when they precede the phrase.
    pub vocabulary: Vocabulary,
}

/// Everything learned from one call.
///
/// A snapshot: built once per call, never changed afterwards, and not tied
/// to the engine that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResult {
    pub(crate) input: String,
    pub(crate) phrase_start: Option<usize>,
    pub(crate) time_phrase: Option<String>,
    pub(crate) ignored_text: Option<String>,
    pub(crate) reference: Option<Instant>,
    pub(crate) start: Option<Instant>,
    pub(crate) end: Option<Instant>,
    pub(crate) interval: Option<Interval>,
}

impl ParsedResult {
    pub(crate) fn unmatched(input: &str) -> Self {
        ParsedResult {
            input: input.to_string(),
            phrase_start: None,
            time_phrase: None,
            ignored_text: None,
            reference: None,
            start: None,
            end: None,
            interval: None,
        }
    }

    /// The text that was submitted.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Character offset into [`input`](Self::input) where the time phrase begins.
    pub fn phrase_start(&self) -> Option<usize> {
        self.phrase_start
    }

    /// The span recognized as a time expression.
    pub fn time_phrase(&self) -> Option<&str> {
        self.time_phrase.as_deref()
    }

    /// The input with the time phrase (and a leading "on"/"in"/"the") removed.
    /// `Some("")` when the whole input was the phrase.
    pub fn ignored_text(&self) -> Option<&str> {
        self.ignored_text.as_deref()
    }

    /// The "now" the engine resolved relative expressions against.
    pub fn reference(&self) -> Option<Instant> {
        self.reference
    }

    /// Resolved instant; for a range, its start.
    pub fn start(&self) -> Option<Instant> {
        self.start
    }

    /// End of a range. `None` for single points in time.
    pub fn end(&self) -> Option<Instant> {
        self.end
    }

    /// `(start, end)` when the phrase denotes a range.
    pub fn interval(&self) -> Option<Interval> {
        self.interval
    }

    pub fn has_match(&self) -> bool {
        self.time_phrase.is_some() || self.start.is_some()
    }
}

const LONG_FORMAT: &str = "%B %-d, %Y at %-I:%M:%S %p %:z";

fn long(instant: Option<Instant>) -> String {
    instant.map_or_else(|| "nil".to_string(), |i| i.format(LONG_FORMAT).to_string())
}

impl fmt::Display for ParsedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_nil = |v: Option<String>| v.unwrap_or_else(|| "nil".to_string());

        writeln!(f, "input: {}", self.input)?;
        writeln!(f, "phrase_start: {}", or_nil(self.phrase_start.map(|o| o.to_string())))?;
        writeln!(f, "time_phrase: {}", or_nil(self.time_phrase.clone()))?;
        writeln!(f, "ignored_text: {}", or_nil(self.ignored_text.clone()))?;
        writeln!(f, "reference: {}", long(self.reference))?;
        writeln!(f, "start: {}", long(self.start))?;
        writeln!(f, "end: {}", long(self.end))?;
        let interval = self.interval.map(|i| format!("{} - {}", long(Some(i.start)), long(Some(i.end))));
        write!(f, "interval: {}", or_nil(interval))
    }
}

/// Timing and engine details for one call.
#[derive(Debug, Clone)]
pub struct ParseDetails {
    /// Name of the engine that served the call.
    pub engine: String,
    /// Total elapsed time.
    pub total: Duration,
    /// Time spent acquiring the engine and inside it.
    pub recognize: Duration,
    /// Time spent building the result.
    pub normalize: Duration,
    /// Matches the engine reported; only the first is used.
    pub reported: usize,
}

/// Result from [`parse_verbose_with`] and [`Engine::parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose {
    pub result: ParsedResult,
    pub details: ParseDetails,
}

impl Engine {
    /// Parse `text` against the wall clock.
    pub fn parse(&self, text: &str) -> ParsedResult {
        self.parse_with(text, &Context::default(), &Options::default())
    }

    /// Parse `text` against a fixed reference instant.
    pub fn parse_at(&self, text: &str, reference: Instant) -> ParsedResult {
        self.parse_with(text, &Context::at(reference), &Options::default())
    }

    pub fn parse_with(&self, text: &str, context: &Context, options: &Options) -> ParsedResult {
        let raw = self.recognize(text, context.reference);
        normalize(text, raw, &options.vocabulary)
    }

    /// Parse and report where the time went.
    pub fn parse_verbose_with(&self, text: &str, context: &Context, options: &Options) -> ParseResultVerbose {
        let started = std::time::Instant::now();
        let run = self.recognize_with_metrics(text, context.reference);

        let normalize_started = std::time::Instant::now();
        let result = normalize(text, run.first, &options.vocabulary);
        let normalize_elapsed = normalize_started.elapsed();

        let details = ParseDetails {
            engine: self.name().to_string(),
            total: started.elapsed(),
            recognize: run.elapsed,
            normalize: normalize_elapsed,
            reported: run.reported,
        };

        ParseResultVerbose { result, details }
    }

    /// The resolved instant (a range's start) found in `text`, if any.
    pub fn extract_instant(&self, text: &str) -> Option<Instant> {
        self.parse(text).start()
    }

    pub fn extract_instant_at(&self, text: &str, reference: Instant) -> Option<Instant> {
        self.parse_at(text, reference).start()
    }

    /// The resolved range found in `text`, if the phrase denotes one.
    pub fn extract_interval(&self, text: &str) -> Option<Interval> {
        self.parse(text).interval()
    }

    pub fn extract_interval_at(&self, text: &str, reference: Instant) -> Option<Interval> {
        self.parse_at(text, reference).interval()
    }
}

/// Parse `text` with the shared engine, resolving against the wall clock.
///
/// Errors only when the shared engine cannot be brought up.
///
/// # Example
/// ```
/// let out = tempophrase::parse("lunch on friday").unwrap();
/// assert_eq!(out.time_phrase(), Some("friday"));
/// assert_eq!(out.ignored_text(), Some("lunch"));
/// ```
pub fn parse(text: &str) -> Result<ParsedResult> {
    Ok(engine::shared()?.parse(text))
}

/// Parse `text` with the shared engine against a fixed reference instant.
pub fn parse_at(text: &str, reference: Instant) -> Result<ParsedResult> {
    Ok(engine::shared()?.parse_at(text, reference))
}

/// Parse `text` with the shared engine and the given `context`/`options`.
pub fn parse_with(text: &str, context: &Context, options: &Options) -> Result<ParsedResult> {
    Ok(engine::shared()?.parse_with(text, context, options))
}

/// [`parse_with`] plus timing details.
pub fn parse_verbose_with(text: &str, context: &Context, options: &Options) -> Result<ParseResultVerbose> {
    Ok(engine::shared()?.parse_verbose_with(text, context, options))
}

pub fn extract_instant(text: &str) -> Result<Option<Instant>> {
    Ok(engine::shared()?.extract_instant(text))
}

pub fn extract_instant_at(text: &str, reference: Instant) -> Result<Option<Instant>> {
    Ok(engine::shared()?.extract_instant_at(text, reference))
}

pub fn extract_interval(text: &str) -> Result<Option<Interval>> {
    Ok(engine::shared()?.extract_interval(text))
}

pub fn extract_interval_at(text: &str, reference: Instant) -> Result<Option<Interval>> {
    Ok(engine::shared()?.extract_interval_at(text, reference))
}
