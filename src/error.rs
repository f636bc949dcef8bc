//! Domain-specific error types for the bootstrap engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`SyncError`]) while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! BootstrapError
//! ├── Config(ConfigError) — TOML parsing, validation, I/O
//! ├── Task(TaskError)     — external command failures
//! └── Sync(SyncError)     — dotfile reconciliation failures
//! ```

use thiserror::Error;

/// Top-level error type for the bootstrap engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Configuration-related error (parsing, validation, I/O).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution error (external command failure).
    #[error("Task execution error: {0}")]
    Task(#[from] TaskError),

    /// Dotfile reconciliation error.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
}

/// Errors that arise from configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML document could not be parsed.
    #[error("Invalid TOML in {file}: {message}")]
    InvalidToml { file: String, message: String },

    /// A section is present but missing a required field.
    #[error("Missing required field '{field}' in [{section}]")]
    MissingField { section: String, field: String },
}

/// Errors that arise during task execution.
#[derive(Error, Debug)]
pub enum TaskError {
    /// An external command exited non-zero.
    #[error("'{command}' exited with code {code}: {stderr}")]
    CommandFailed {
        /// The command that was run.
        command: String,
        /// Exit code (-1 when terminated by signal).
        code: i32,
        /// Captured stderr, trimmed.
        stderr: String,
    },
}

/// Errors that arise from the dotfile reconciler.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The source tree root does not exist or is not a directory.
    #[error("Source tree not found: {0}")]
    SourceMissing(String),

    /// Reading the operator's response failed.
    #[error("Failed to read prompt response: {0}")]
    Prompt(#[from] std::io::Error),
}
