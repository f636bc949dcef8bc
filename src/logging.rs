//! Structured logging with dry-run awareness and summary collection.
//!
//! Terminal output goes through [`Logger`]; every message is also emitted as
//! a [`tracing`] event so the subscriber installed by [`init_subscriber`]
//! can persist a complete run log under `$XDG_CACHE_HOME/bootstrap/`.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    pub name: String,
    pub status: TaskStatus,
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Ok,
    NotApplicable,
    Skipped,
    DryRun,
    Failed,
}

/// Return the log file path under `$XDG_CACHE_HOME/bootstrap/` (or `~/.cache/bootstrap/`).
fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache_dir = std::env::var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cache")
        });
    let dir = cache_dir.join("bootstrap");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Writer handle cloned per tracing event.
struct FileWriter(Arc<fs::File>);

impl io::Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.0).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self.0).flush()
    }
}

/// Install the global tracing subscriber that persists all events to the
/// per-command log file.
///
/// Console output is handled by [`Logger`] directly; the subscriber only
/// writes the file. Does nothing when the cache directory is unavailable or
/// a subscriber is already installed (tests).
pub fn init_subscriber(command: &str, verbose: bool) {
    let Some(path) = log_file_path(command) else {
        return;
    };
    let Ok(file) = fs::File::create(&path) else {
        return;
    };
    let file = Arc::new(file);

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bootstrap_cli={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(move || FileWriter(Arc::clone(&file)))
        .try_init();
}

/// Structured logger with dry-run awareness and summary collection.
#[derive(Debug)]
pub struct Logger {
    verbose: bool,
    tasks: RefCell<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            tasks: RefCell::new(Vec::new()),
            log_file: None,
        }
    }

    /// Create a logger that remembers the log file path for the summary.
    #[must_use]
    pub fn with_log_file(command: &str, verbose: bool) -> Self {
        Self {
            verbose,
            tasks: RefCell::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
        eprintln!("\x1b[31mERROR\x1b[0m {msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
        eprintln!("\x1b[33mWARN\x1b[0m  {msg}");
    }

    /// Announce a new stage of the run.
    pub fn stage(&self, msg: &str) {
        tracing::info!("==> {msg}");
        println!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
        println!("  {msg}");
    }

    /// Log a debug message (terminal output only when verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
        if self.verbose {
            println!("  \x1b[2m{msg}\x1b[0m");
        }
    }

    /// Log a dry-run action.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!("[dry run] {msg}");
        println!("  \x1b[33m[DRY RUN]\x1b[0m {msg}");
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks.borrow_mut().push(TaskEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }

    /// Number of tasks recorded as failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .count()
    }

    /// Whether any task failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Print the summary of all recorded tasks.
    pub fn print_summary(&self) {
        let tasks = self.tasks.borrow();
        if tasks.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        let mut ok = 0u32;
        let mut not_applicable = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for task in tasks.iter() {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::NotApplicable => {
                    not_applicable += 1;
                    ("·", "\x1b[2m")
                }
                TaskStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TaskStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[33m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = match &task.message {
                Some(msg) => format!(" ({msg})"),
                None => String::new(),
            };

            tracing::info!("{icon} {}{suffix}", task.name);
            println!("  {color}{icon} {}{suffix}\x1b[0m", task.name);
        }

        println!();
        let total = ok + not_applicable + skipped + dry_run + failed;
        tracing::info!(
            "{total} tasks: {ok} ok, {not_applicable} n/a, {skipped} skipped, {dry_run} dry-run, {failed} failed"
        );
        println!(
            "  {total} tasks: \x1b[32m{ok} ok\x1b[0m, {not_applicable} n/a, \x1b[33m{skipped} skipped\x1b[0m, {dry_run} dry-run, \x1b[31m{failed} failed\x1b[0m"
        );

        if let Some(path) = &self.log_file {
            println!("  \x1b[2mlog: {}\x1b[0m", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_new() {
        let log = Logger::new(false);
        assert!(!log.verbose);
        assert!(log.tasks.borrow().is_empty());
    }

    #[test]
    fn logger_verbose() {
        let log = Logger::new(true);
        assert!(log.verbose);
    }

    #[test]
    fn record_task_ok() {
        let log = Logger::new(false);
        log.record_task("dotfiles", TaskStatus::Ok, None);
        let tasks = log.tasks.borrow();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "dotfiles");
        assert_eq!(tasks[0].status, TaskStatus::Ok);
    }

    #[test]
    fn record_task_with_message() {
        let log = Logger::new(false);
        log.record_task("packages", TaskStatus::Skipped, Some("not on fedora"));
        let tasks = log.tasks.borrow();
        assert_eq!(tasks[0].message, Some("not on fedora".to_string()));
    }

    #[test]
    fn record_multiple_tasks() {
        let log = Logger::new(false);
        log.record_task("a", TaskStatus::Ok, None);
        log.record_task("b", TaskStatus::Failed, Some("error"));
        log.record_task("c", TaskStatus::DryRun, None);
        assert_eq!(log.tasks.borrow().len(), 3);
    }

    #[test]
    fn failure_count_counts_only_failures() {
        let log = Logger::new(false);
        log.record_task("a", TaskStatus::Ok, None);
        log.record_task("b", TaskStatus::Failed, None);
        log.record_task("c", TaskStatus::Failed, None);
        assert_eq!(log.failure_count(), 2);
        assert!(log.has_failures());
    }

    #[test]
    fn no_failures_by_default() {
        let log = Logger::new(false);
        log.record_task("a", TaskStatus::Skipped, None);
        assert!(!log.has_failures());
    }
}
