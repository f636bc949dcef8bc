use std::path::PathBuf;

use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};

const MISE_INSTALL_URL: &str = "https://mise.run";

/// Install mise and activate the configured toolchains globally.
pub struct InstallToolchains;

impl Task for InstallToolchains {
    fn name(&self) -> &str {
        "Install toolchains"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.toolchains.is_empty() && ctx.platform.is_linux()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::default();

        let Some(mise) = self.ensure_mise(ctx, &mut stats)? else {
            return Ok(TaskResult::DryRun);
        };

        for tool in &ctx.config.toolchains {
            if ctx.dry_run {
                ctx.log.dry_run(&format!("would activate {tool}"));
                stats.changed += 1;
            } else {
                ctx.executor.run(&mise, &["use", "--global", "-y", tool])?;
                ctx.log.info(&format!("Activated {tool}"));
                stats.changed += 1;
            }
        }

        Ok(stats.finish(ctx))
    }
}

impl InstallToolchains {
    /// Locate mise, installing it when absent. Returns `None` when a dry run
    /// would have to install it first (nothing downstream can run either).
    fn ensure_mise(&self, ctx: &Context, stats: &mut TaskStats) -> Result<Option<String>> {
        if ctx.executor.which("mise") {
            ctx.log.debug("ok: mise on PATH");
            stats.already_ok += 1;
            return Ok(Some("mise".to_string()));
        }

        let local = local_mise_path(ctx);
        if local.is_file() {
            ctx.log.debug(&format!("ok: mise at {}", local.display()));
            stats.already_ok += 1;
            return Ok(Some(local.to_string_lossy().into_owned()));
        }

        if ctx.dry_run {
            ctx.log.dry_run("would install mise");
            ctx.log.dry_run("would activate the configured toolchains");
            return Ok(None);
        }

        let script = format!("curl -fsSL {MISE_INSTALL_URL} | sh");
        ctx.executor.run("sh", &["-c", &script])?;
        ctx.log.info("Installed mise");
        stats.changed += 1;
        Ok(Some(local.to_string_lossy().into_owned()))
    }
}

/// Where the mise installer places the binary.
fn local_mise_path(ctx: &Context) -> PathBuf {
    ctx.home.join(".local/bin/mise")
}
