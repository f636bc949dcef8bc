use std::io::Write as _;
use std::path::Path;

use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};

const REPOS_DIR: &str = "/etc/yum.repos.d";

/// Register third-party dnf repositories before any package installs.
pub struct ConfigurePackageRepos;

impl Task for ConfigurePackageRepos {
    fn name(&self) -> &str {
        "Configure package repositories"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.package_repos.is_empty() && ctx.platform.is_fedora && ctx.executor.which("dnf")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::default();

        for repo in &ctx.config.package_repos {
            let Some(file_name) = repo.repo_file_name() else {
                ctx.log
                    .warn("package repo entry has neither 'url' nor 'file', skipping");
                stats.skipped += 1;
                continue;
            };

            if Path::new(REPOS_DIR).join(&file_name).exists() {
                ctx.log.debug(&format!("ok: {file_name} (already present)"));
                stats.already_ok += 1;
                continue;
            }

            if let Some(url) = &repo.url {
                if ctx.dry_run {
                    ctx.log.dry_run(&format!("would add repo from {url}"));
                } else {
                    ctx.executor
                        .run("sudo", &["dnf", "config-manager", "--add-repo", url])?;
                    ctx.log.info(&format!("Added {file_name}"));
                }
                stats.changed += 1;
            } else if let Some(content) = &repo.content {
                if ctx.dry_run {
                    ctx.log
                        .dry_run(&format!("would write {REPOS_DIR}/{file_name}"));
                } else {
                    install_repo_file(ctx, &file_name, content)?;
                    ctx.log.info(&format!("Installed {file_name}"));
                }
                stats.changed += 1;
            } else {
                // file name without content cannot be materialised
                ctx.log
                    .warn(&format!("package repo '{file_name}' has no content, skipping"));
                stats.skipped += 1;
            }
        }

        Ok(stats.finish(ctx))
    }
}

/// Stage the repo definition in a temp file and move it into place with
/// root's ownership and world-readable permissions.
fn install_repo_file(ctx: &Context, file_name: &str, content: &str) -> Result<()> {
    let mut tmp = tempfile::NamedTempFile::new().context("creating temp repo file")?;
    tmp.write_all(content.as_bytes())
        .context("writing temp repo file")?;
    // the mv takes the file away; TempPath's drop ignores the missing file
    let staged = tmp.into_temp_path();
    let staged_str = staged.to_string_lossy().into_owned();
    let dest = format!("{REPOS_DIR}/{file_name}");

    ctx.executor.run("sudo", &["mv", &staged_str, &dest])?;
    ctx.executor.run("sudo", &["chmod", "644", &dest])?;
    Ok(())
}
