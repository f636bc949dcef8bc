use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::GitIdentity;

/// Apply the configured git identity and defaults via `git config --global`.
pub struct ConfigureGit;

/// The key/value pairs a [`GitIdentity`] expands to.
fn settings(git: &GitIdentity) -> Vec<(&'static str, String)> {
    vec![
        ("user.name", git.name.clone()),
        ("user.email", git.email.clone()),
        ("init.defaultBranch", git.default_branch.clone()),
        (
            "push.autoSetupRemote",
            if git.auto_setup_remote { "true" } else { "false" }.to_string(),
        ),
    ]
}

impl Task for ConfigureGit {
    fn name(&self) -> &str {
        "Configure git"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.git.is_some() && ctx.executor.which("git")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(git) = &ctx.config.git else {
            return Ok(TaskResult::Skipped("no [git] section".to_string()));
        };

        let mut stats = TaskStats::default();

        for (key, desired) in settings(git) {
            let current = ctx
                .executor
                .run_unchecked("git", &["config", "--global", "--get", key])
                .map(|r| r.stdout.trim().to_string())
                .unwrap_or_default();

            if current == desired {
                ctx.log
                    .debug(&format!("ok: {key} = {desired} (already set)"));
                stats.already_ok += 1;
            } else {
                if ctx.dry_run {
                    ctx.log.dry_run(&format!("would set {key} = {desired}"));
                } else {
                    ctx.executor
                        .run("git", &["config", "--global", key, &desired])?;
                    ctx.log.info(&format!("Set {key} = {desired}"));
                }
                stats.changed += 1;
            }
        }

        Ok(stats.finish(ctx))
    }
}
