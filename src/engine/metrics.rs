//! Per-call recognition metrics.
//!
//! `Engine::recognize` is the hot path and returns only the first match.
//! `Engine::recognize_with_metrics` additionally reports timing and how many
//! matches the engine produced (everything past the first is dropped).

use super::raw::RawMatch;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct RecognizeRun {
    /// First match reported by the engine, if any.
    pub first: Option<RawMatch>,
    /// Total number of matches the engine reported.
    pub reported: usize,
    /// Time spent waiting for the lock and inside the engine.
    pub elapsed: Duration,
}

impl RecognizeRun {
    /// Matches that were reported but not used.
    pub fn dropped(&self) -> usize {
        self.reported.saturating_sub(1)
    }
}
