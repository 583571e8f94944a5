//! External checker invocation.
//!
//! The engine only needs "run this argv with the document text on stdin and
//! give me stdout as text". Everything else about process management lives
//! behind the [`Invoker`] trait so tests can substitute canned output.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::CheckerError;

/// Runs a checker command against document text.
///
/// Implementations must not re-enter engine state from within `invoke`.
pub trait Invoker: Send + Sync {
    /// Invokes `command`, feeding `input` on stdin, and returns stdout.
    fn invoke(&self, command: &[String], input: &str) -> Result<String, CheckerError>;
}

/// Spawns the checker as a child process.
#[derive(Debug, Default)]
pub struct CommandInvoker;

impl CommandInvoker {
    /// Creates a new command invoker.
    pub fn new() -> Self {
        Self
    }
}

impl Invoker for CommandInvoker {
    fn invoke(&self, command: &[String], input: &str) -> Result<String, CheckerError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| CheckerError::invocation("empty command"))?;

        debug!("Running checker: {}", command.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CheckerError::invocation(format!("{program}: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A checker that closes stdin early is fine; its output decides.
            let _ = stdin.write_all(input.as_bytes());
        }

        let output = child.wait_with_output()?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
