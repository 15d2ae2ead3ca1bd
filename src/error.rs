//! Errors raised while bringing a recognition engine up.
//!
//! Parsing itself never fails: "nothing recognized" and malformed engine
//! fields both end up as absent fields on the result.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("recognition engine unavailable: {0}")]
    Unavailable(String),

    #[error("grammar resource not found: {}", .0.display())]
    MissingGrammar(PathBuf),

    #[error("failed to launch recognition engine `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("shared recognition engine is already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, EngineError>;
