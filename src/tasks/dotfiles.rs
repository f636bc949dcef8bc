use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::sync::{self, TerminalResolver};

/// Reconcile the dotfiles source tree into the home directory.
///
/// Runs last in the install sequence so nothing (the oh-my-zsh installer in
/// particular) can clobber files after they are synced.
pub struct SyncDotfiles;

impl Task for SyncDotfiles {
    fn name(&self) -> &str {
        "Sync dotfiles"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let source = ctx.config.dotfiles_source();
        let mut resolver = TerminalResolver::stdio();
        let stats = sync::reconcile(&source, &ctx.home, &mut resolver, ctx.log, ctx.dry_run)?;
        ctx.log.info(&stats.summary());

        if ctx.dry_run && (stats.changed() > 0 || stats.conflicts > 0) {
            Ok(TaskResult::DryRun)
        } else {
            Ok(TaskResult::Ok)
        }
    }
}
