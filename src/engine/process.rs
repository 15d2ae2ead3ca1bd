//! Recognizer hosted in a long-lived child process.
//!
//! Lets a date engine written for another runtime (a JavaScript grammar run
//! by `node`, say) sit behind the same [`Recognizer`] contract. The child is
//! started once with its grammar resource and then spoken to over
//! line-delimited JSON:
//!
//! ```text
//! stdin  ▶ {"text":"tomorrow from 3-4 PM","reference":"2016-11-20T09:41:00-06:00"}
//! stdout ◀ [{"index":0,"text":"tomorrow from 3-4 PM","ref":"...","start":"...","end":"..."}]
//! ```
//!
//! `reference` is `null` when the caller wants the wall clock. Missing or
//! `null` keys in a reply read back as [`RawValue::Undefined`].
//!
//! Exactly one line answers each request. A reply that does not parse, or a
//! line arriving when no request is outstanding, breaks the engine: from
//! then on every call recognizes nothing, so output meant for one call can
//! never be read as the answer to another.

use super::raw::{RawMatch, RawValue};
use super::recognizer::Recognizer;
use crate::Instant;
use crate::error::{EngineError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// How to launch an external engine.
#[derive(Debug, Clone, Default)]
pub struct ProcessConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Grammar resource handed to the engine as its last argument. Checked
    /// for existence before launching.
    pub grammar: Option<PathBuf>,
}

#[derive(Serialize)]
struct Request<'a> {
    text: &'a str,
    reference: Option<String>,
}

#[derive(Deserialize)]
struct WireMatch {
    #[serde(default)]
    index: Value,
    #[serde(default)]
    text: Value,
    #[serde(default, rename = "ref")]
    reference: Value,
    #[serde(default)]
    start: Value,
    #[serde(default)]
    end: Value,
}

impl From<WireMatch> for RawMatch {
    fn from(wire: WireMatch) -> Self {
        RawMatch {
            index: raw_value(wire.index),
            text: raw_value(wire.text),
            reference: raw_value(wire.reference),
            start: raw_value(wire.start),
            end: raw_value(wire.end),
        }
    }
}

fn raw_value(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Undefined,
        Value::Number(n) => n.as_f64().map_or_else(|| RawValue::Opaque(n.to_string()), RawValue::Number),
        Value::String(s) => RawValue::Text(s),
        other => RawValue::Opaque(other.to_string()),
    }
}

#[derive(Debug)]
pub struct ProcessRecognizer {
    name: String,
    child: Child,
    stdin: ChildStdin,
    /// Lines read from the child's stdout by a reader thread.
    replies: Receiver<io::Result<String>>,
    /// Set once the pipe or the protocol breaks; later calls return no
    /// matches without touching the child.
    broken: bool,
}

impl ProcessRecognizer {
    pub fn spawn(config: &ProcessConfig) -> Result<Self> {
        if let Some(grammar) = &config.grammar {
            if !grammar.is_file() {
                return Err(EngineError::MissingGrammar(grammar.clone()));
            }
        }

        let mut command = Command::new(&config.program);
        command.args(&config.args);
        if let Some(grammar) = &config.grammar {
            command.arg(grammar);
        }
        command.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::inherit());

        let mut child =
            command.spawn().map_err(|source| EngineError::Spawn { program: config.program.clone(), source })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(EngineError::Unavailable(format!("`{}` did not expose stdin/stdout", config.program)));
        };

        let replies = match read_lines(stdout, &config.program) {
            Ok(replies) => replies,
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::Unavailable(format!("cannot read from `{}`: {}", config.program, err)));
            }
        };

        debug!("[process] started `{}` (pid {})", config.program, child.id());

        Ok(ProcessRecognizer { name: config.program.clone(), child, stdin, replies, broken: false })
    }

    /// Submit one request and read the reply line back.
    fn exchange(&mut self, text: &str, reference: Option<Instant>) -> io::Result<String> {
        let request = Request { text, reference: reference.map(|r| r.to_rfc3339()) };
        let mut line = serde_json::to_string(&request).map_err(io::Error::other)?;
        line.push('\n');

        match self.replies.try_recv() {
            Ok(_) => return Err(io::Error::new(ErrorKind::InvalidData, "engine wrote a line nobody asked for")),
            Err(TryRecvError::Disconnected) => return Err(closed()),
            Err(TryRecvError::Empty) => {}
        }

        self.stdin.write_all(line.as_bytes())?;
        self.stdin.flush()?;

        self.replies.recv().map_err(|_| closed())?
    }
}

fn closed() -> io::Error {
    io::Error::new(ErrorKind::UnexpectedEof, "engine closed its output")
}

/// Forward every line the child writes to a channel. The thread ends when
/// the child's stdout closes or the recognizer is dropped.
fn read_lines(stdout: ChildStdout, program: &str) -> io::Result<Receiver<io::Result<String>>> {
    let (tx, rx) = mpsc::channel();

    thread::Builder::new().name(format!("tempophrase-{program}")).spawn(move || {
        let mut reader = BufReader::new(stdout);
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(Ok(line)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx.send(Err(err));
                    break;
                }
            }
        }
    })?;

    Ok(rx)
}

impl Recognizer for ProcessRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&mut self, text: &str, reference: Option<Instant>) -> Vec<RawMatch> {
        if self.broken {
            return Vec::new();
        }

        let reply = match self.exchange(text, reference) {
            Ok(reply) => reply,
            Err(err) => {
                warn!("[process] exchange with `{}` failed: {}", self.name, err);
                self.broken = true;
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<WireMatch>>(reply.trim()) {
            Ok(matches) => matches.into_iter().map(RawMatch::from).collect(),
            Err(err) => {
                warn!("[process] `{}` sent an unreadable reply: {}", self.name, err);
                self.broken = true;
                Vec::new()
            }
        }
    }
}

impl Drop for ProcessRecognizer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
