use anyhow::Result;

use super::{Context, Task, TaskResult};

/// Bring all installed packages up to date before anything else runs.
pub struct SystemUpdate;

impl Task for SystemUpdate {
    fn name(&self) -> &str {
        "Update system packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_fedora && ctx.executor.which("dnf")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            ctx.log.dry_run("would run: sudo dnf update -y");
            return Ok(TaskResult::DryRun);
        }

        ctx.executor.run("sudo", &["dnf", "update", "-y"])?;
        Ok(TaskResult::Ok)
    }
}
