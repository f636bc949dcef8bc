//! Named tasks that converge the machine towards the configured state.

pub mod context;
pub mod dotfiles;
pub mod fonts;
pub mod git_config;
pub mod github_packages;
pub mod package_repos;
pub mod packages;
pub mod repos;
pub mod shell;
pub mod toolchains;
pub mod update;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Outcome of a single task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// The task ran (it may or may not have changed anything).
    Ok,
    /// The task decided at runtime not to act, with a reason.
    Skipped(String),
    /// Dry-run mode: changes were previewed, not applied.
    DryRun,
}

/// Per-item counters a task accumulates while converging a list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub changed: u32,
    pub already_ok: u32,
    pub skipped: u32,
}

impl TaskStats {
    /// One-line human summary, e.g. `2 changed, 5 already ok, 1 skipped`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} changed", self.changed),
            format!("{} already ok", self.already_ok),
        ];
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        parts.join(", ")
    }

    /// Convert the counters into a [`TaskResult`], logging the summary.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary());
        if ctx.dry_run && self.changed > 0 {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

/// A named, executable step of the install sequence.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies on the current platform/config.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails, such as when an external command
    /// exits non-zero or a file operation is not permitted.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete install sequence, in execution order.
///
/// Ordering matters: package repos must exist before packages install,
/// packages (git, zsh) before the steps that use them, and the dotfile
/// reconciliation runs last so shell setup cannot clobber synced files.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(update::SystemUpdate),
        Box::new(package_repos::ConfigurePackageRepos),
        Box::new(packages::InstallPackageGroups),
        Box::new(packages::InstallPackages),
        Box::new(git_config::ConfigureGit),
        Box::new(repos::CloneRepositories),
        Box::new(shell::ConfigureShell),
        Box::new(toolchains::InstallToolchains),
        Box::new(fonts::InstallNerdFonts),
        Box::new(fonts::InstallFontsourceFonts),
        Box::new(fonts::UpdateFontCache),
        Box::new(github_packages::InstallGithubPackages),
        Box::new(packages::InstallNpmPackages),
        Box::new(packages::InstallGoPackages),
        Box::new(dotfiles::SyncDotfiles),
    ]
}

/// Execute a task and record the result in the logger.
///
/// Returns the recorded status so the caller can stop the sequence on
/// failure.
pub fn execute(task: &dyn Task, ctx: &Context) -> TaskStatus {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return TaskStatus::NotApplicable;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            TaskStatus::Ok
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            TaskStatus::Skipped
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            TaskStatus::DryRun
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            TaskStatus::Failed
        }
    }
}
