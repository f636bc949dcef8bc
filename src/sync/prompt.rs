//! Conflict decisions and the interactive resolver.
//!
//! The reconciler never reads the terminal itself: it hands each conflict to
//! a [`ConflictResolver`], so tests (and future scripted runs) can supply
//! decisions without a TTY.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::error::SyncError;

/// Prompt shown for each diverged file.
pub const PROMPT: &str =
    "What would you like to do? [o]verwrite, [c]opy to source, [s]kip, [q]uit: ";

/// Outcome chosen for a single diverged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Copy source over destination, discarding destination edits.
    Overwrite,
    /// Copy destination back into the source tree.
    CopyToSource,
    /// Leave both sides untouched this run.
    Skip,
    /// Abort the entire reconciliation immediately.
    Quit,
}

/// A diverged file pair presented to the resolver.
#[derive(Debug)]
pub struct Conflict<'a> {
    /// File in the canonical source tree.
    pub source: &'a Path,
    /// Newer file in the destination tree.
    pub dest: &'a Path,
    /// Unified diff, source as "from" and destination as "to".
    pub diff: &'a str,
}

/// Decides the outcome for each diverged file pair.
pub trait ConflictResolver {
    /// Produce a decision for `conflict`.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision source fails (e.g. stdin closed).
    fn resolve(&mut self, conflict: &Conflict<'_>) -> Result<Decision, SyncError>;
}

/// Map a prompt response to a decision. `None` means invalid input.
#[must_use]
pub fn parse_choice(input: &str) -> Option<Decision> {
    match input.trim().to_lowercase().as_str() {
        "o" => Some(Decision::Overwrite),
        "c" => Some(Decision::CopyToSource),
        "s" => Some(Decision::Skip),
        "q" => Some(Decision::Quit),
        _ => None,
    }
}

/// Interactive resolver that shows the diff and prompts on the terminal.
///
/// Generic over its reader/writer so the prompt loop is testable with
/// in-memory buffers. Invalid input is reported and treated as [`Decision::Skip`].
#[derive(Debug)]
pub struct TerminalResolver<R, W> {
    input: R,
    output: W,
}

impl TerminalResolver<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Resolver wired to the process stdin/stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self {
            input: std::io::stdin().lock(),
            output: std::io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> TerminalResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ConflictResolver for TerminalResolver<R, W> {
    fn resolve(&mut self, conflict: &Conflict<'_>) -> Result<Decision, SyncError> {
        writeln!(
            self.output,
            "\nFile {} is newer than {}",
            conflict.dest.display(),
            conflict.source.display()
        )?;
        write!(self.output, "{}", conflict.diff)?;
        write!(self.output, "{PROMPT}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;

        match parse_choice(&line) {
            Some(decision) => Ok(decision),
            None => {
                writeln!(self.output, "Invalid choice, skipping")?;
                Ok(Decision::Skip)
            }
        }
    }
}
