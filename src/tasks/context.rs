use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform::Platform;

/// Shared context for task execution.
///
/// Tasks run strictly in sequence, so everything is borrowed for the
/// duration of the run rather than shared behind `Arc`s.
pub struct Context<'a> {
    /// Desired state loaded from `bootstrap.toml`.
    pub config: &'a Config,
    /// Detected platform information.
    pub platform: &'a Platform,
    /// Logger for output and task recording.
    pub log: &'a Logger,
    /// Whether to preview changes without applying them.
    pub dry_run: bool,
    /// The home directory targeted by the run.
    pub home: PathBuf,
    /// Command executor (stubbed in tests, real otherwise).
    pub executor: &'a dyn Executor,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("platform", &self.platform)
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl<'a> Context<'a> {
    /// Create a context, resolving the home directory from the override when
    /// given, otherwise from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when no home override is given and the home directory
    /// cannot be determined.
    pub fn new(
        config: &'a Config,
        platform: &'a Platform,
        log: &'a Logger,
        dry_run: bool,
        home_override: Option<PathBuf>,
        executor: &'a dyn Executor,
    ) -> Result<Self> {
        let home = match home_override {
            Some(home) => home,
            None => dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("cannot determine the home directory"))?,
        };

        Ok(Self {
            config,
            platform,
            log,
            dry_run,
            home,
            executor,
        })
    }
}
