//! The recognition engine adapter.
//!
//! An [`Engine`] owns exactly one recognizer for as long as it lives. Every
//! call goes through one mutex held from "submit text" through "read the
//! result back", so an engine that stages results internally can never hand
//! one caller another caller's answer.
//!
//! There are two ways to hold an engine:
//!
//! - a scoped session: build an `Engine` and drop it when done (dropping
//!   tears the recognizer down, e.g. stops a child process);
//! - the process-wide handle from [`shared`], created on first use with the
//!   default English engine, or installed up front with [`init_shared`].

use super::english::{EngineConfig, EnglishRecognizer};
use super::metrics::RecognizeRun;
use super::process::{ProcessConfig, ProcessRecognizer};
use super::raw::RawMatch;
use super::recognizer::Recognizer;
use crate::Instant;
use crate::error::{EngineError, Result};
use log::{debug, trace};
use once_cell::sync::OnceCell;
use std::sync::{Mutex, PoisonError};

static SHARED: OnceCell<Engine> = OnceCell::new();

pub struct Engine {
    name: String,
    handle: Mutex<Box<dyn Recognizer>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("name", &self.name).field("handle", &"<recognizer>").finish()
    }
}

impl Engine {
    /// Wrap an already constructed recognizer.
    pub fn new(recognizer: impl Recognizer + 'static) -> Self {
        let name = recognizer.name().to_string();
        debug!("[engine] using {}", name);
        Engine { name, handle: Mutex::new(Box::new(recognizer)) }
    }

    /// The built-in English engine.
    pub fn english(config: &EngineConfig) -> Result<Self> {
        Ok(Engine::new(EnglishRecognizer::new(config)?))
    }

    /// An engine running in a child process.
    pub fn process(config: &ProcessConfig) -> Result<Self> {
        Ok(Engine::new(ProcessRecognizer::spawn(config)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First match the engine reports for `text`, or `None`.
    pub fn recognize(&self, text: &str, reference: Option<Instant>) -> Option<RawMatch> {
        self.recognize_with_metrics(text, reference).first
    }

    /// Like [`Engine::recognize`], with timing and match counts.
    pub fn recognize_with_metrics(&self, text: &str, reference: Option<Instant>) -> RecognizeRun {
        let started = std::time::Instant::now();

        if text.is_empty() {
            return RecognizeRun { first: None, reported: 0, elapsed: started.elapsed() };
        }

        let matches = {
            // Engines keep no invariant a panicking caller could break, so a
            // poisoned lock is still usable.
            let mut recognizer = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
            recognizer.recognize(text, reference)
        };

        let reported = matches.len();
        if reported > 1 {
            trace!("[engine] {} reported {} matches, keeping the first", self.name, reported);
        }

        RecognizeRun { first: matches.into_iter().next(), reported, elapsed: started.elapsed() }
    }
}

/// The process-wide engine, created with the default English configuration
/// on first use.
///
/// Fails only if that first construction fails; later calls retry.
pub fn shared() -> Result<&'static Engine> {
    SHARED.get_or_try_init(|| Engine::english(&EngineConfig::default()))
}

/// Install `engine` as the process-wide engine.
///
/// Must happen before anything calls [`shared`].
pub fn init_shared(engine: Engine) -> Result<&'static Engine> {
    let mut installed = false;
    let current = SHARED.get_or_init(|| {
        installed = true;
        engine
    });

    if installed { Ok(current) } else { Err(EngineError::AlreadyInitialized) }
}
