use std::io::Write as _;

use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::GithubPackage;
use crate::github;

/// Install programs published as RPMs on GitHub releases.
pub struct InstallGithubPackages;

impl Task for InstallGithubPackages {
    fn name(&self) -> &str {
        "Install GitHub packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.github_packages.is_empty()
            && ctx.platform.is_fedora
            && ctx.executor.which("dnf")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::default();

        for pkg in &ctx.config.github_packages {
            if ctx.executor.which(pkg.program()) {
                ctx.log
                    .debug(&format!("ok: {} (already on PATH)", pkg.program()));
                stats.already_ok += 1;
                continue;
            }

            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would install {}/{}", pkg.owner, pkg.repo));
                stats.changed += 1;
                continue;
            }

            match install_release_rpm(ctx, pkg) {
                Ok(true) => {
                    ctx.log.info(&format!("Installed {}", pkg.program()));
                    stats.changed += 1;
                }
                Ok(false) => {
                    ctx.log.warn(&format!(
                        "no {} rpm asset in the latest {}/{} release, skipping",
                        ctx.platform.release_arch(),
                        pkg.owner,
                        pkg.repo
                    ));
                    stats.skipped += 1;
                }
                Err(e) => {
                    ctx.log.warn(&format!(
                        "failed to install {}/{}: {e:#}",
                        pkg.owner, pkg.repo
                    ));
                    stats.skipped += 1;
                }
            }
        }

        Ok(stats.finish(ctx))
    }
}

/// Download and install the release RPM. Returns `Ok(false)` when the latest
/// release carries no matching asset.
fn install_release_rpm(ctx: &Context, pkg: &GithubPackage) -> Result<bool> {
    let release = github::fetch_latest_release(&pkg.owner, &pkg.repo)?;
    let Some(url) = github::rpm_asset_url(&release.assets, ctx.platform.release_arch()) else {
        return Ok(false);
    };

    let mut rpm = tempfile::Builder::new()
        .suffix(".rpm")
        .tempfile()
        .context("creating temp rpm file")?;
    github::download(&url, &mut rpm)?;
    rpm.flush().context("flushing rpm download")?;

    let rpm_path = rpm.path().to_string_lossy().into_owned();
    ctx.executor.run("sudo", &["dnf", "install", "-y", &rpm_path])?;
    Ok(true)
}
