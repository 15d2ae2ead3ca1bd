//! Recognition engine adapter.
//!
//! Phrase recognition is not done here. It belongs to a [`Recognizer`]: a
//! black box that takes `(text, reference?)` and returns zero or more loosely
//! typed [`RawMatch`]es. This module owns the handle to one, serializes access
//! to it, and keeps only the first match.
//!
//! ```text
//!                 ┌──────────── Engine (adapter.rs) ─────────────┐
//! text, ref? ───▶ │ lock ─▶ Recognizer::recognize ─▶ first match │ ───▶ Option<RawMatch>
//!                 └──────────────────┬───────────────────────────┘
//!                                    │ one of
//!            ┌───────────────────────┼───────────────────────────┐
//!            ▼                       ▼                           ▼
//!   EnglishRecognizer        ProcessRecognizer            your own impl
//!   (english.rs,             (process.rs, JSON lines
//!    chrono-english +         to a child process)
//!    lexicon.rs windows)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `recognizer.rs`: the [`Recognizer`] call contract.
//! - `raw.rs`: [`RawValue`] / [`RawMatch`], engine output before validation.
//! - `adapter.rs`: [`Engine`], the process-wide [`shared`] handle.
//! - `english.rs`: the default engine over `chrono-english`.
//! - `lexicon.rs`: word classes deciding which spans the English engine tries.
//! - `process.rs`: engines hosted in a child process.
//! - `metrics.rs`: per-call timing and match counts.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG`-style verbosity (`tempophrase -vv`, or
//! `TEMPOPHRASE_LOG=trace`) to see the windows the English engine submits.

#[path = "engine/adapter.rs"]
mod adapter;
#[path = "engine/english.rs"]
mod english;
#[path = "engine/lexicon.rs"]
mod lexicon;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/process.rs"]
mod process;
#[path = "engine/raw.rs"]
mod raw;
#[path = "engine/recognizer.rs"]
mod recognizer;

pub use adapter::{Engine, init_shared, shared};
pub use english::{Dialect, EngineConfig, EnglishRecognizer, MAX_WINDOW_WORDS};
pub use metrics::RecognizeRun;
pub use process::{ProcessConfig, ProcessRecognizer};
pub use raw::{RawMatch, RawValue};
pub use recognizer::Recognizer;
