use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};

const OMZ_INSTALL_URL: &str =
    "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh";

/// Install zsh, make it the login shell, and install oh-my-zsh.
pub struct ConfigureShell;

impl Task for ConfigureShell {
    fn name(&self) -> &str {
        "Configure shell"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_linux()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if std::env::var_os("CI").is_some() {
            return Ok(TaskResult::Skipped("running in CI".to_string()));
        }
        let Ok(user) = std::env::var("USER") else {
            return Ok(TaskResult::Skipped("USER is not set".to_string()));
        };

        let mut stats = TaskStats::default();

        if !self.ensure_zsh(ctx, &mut stats)? {
            return Ok(stats.finish(ctx));
        }
        self.ensure_login_shell(ctx, &user, &mut stats)?;
        self.ensure_oh_my_zsh(ctx, &mut stats)?;
        Ok(stats.finish(ctx))
    }
}

impl ConfigureShell {
    /// Install zsh when absent. Returns whether the follow-up steps can run
    /// (false when zsh is unavailable or a dry run would install it first).
    fn ensure_zsh(&self, ctx: &Context, stats: &mut TaskStats) -> Result<bool> {
        if ctx.executor.which("zsh") {
            ctx.log.debug("ok: zsh installed");
            stats.already_ok += 1;
            return Ok(true);
        }

        if !(ctx.platform.is_fedora && ctx.executor.which("dnf")) {
            ctx.log.warn("zsh is not installed and dnf is unavailable, skipping");
            stats.skipped += 1;
            return Ok(false);
        }

        if ctx.dry_run {
            ctx.log.dry_run("would install zsh");
            ctx.log.dry_run("would change the login shell and install oh-my-zsh");
            stats.changed += 1;
            return Ok(false);
        }

        ctx.executor.run("sudo", &["dnf", "install", "-y", "zsh"])?;
        ctx.log.info("Installed zsh");
        stats.changed += 1;
        Ok(true)
    }

    fn ensure_login_shell(&self, ctx: &Context, user: &str, stats: &mut TaskStats) -> Result<()> {
        let current = login_shell(ctx, user);
        if current.as_deref().is_some_and(|s| s.ends_with("/zsh")) {
            ctx.log.debug("ok: login shell is zsh");
            stats.already_ok += 1;
            return Ok(());
        }

        if ctx.dry_run {
            ctx.log.dry_run(&format!("would change login shell of {user} to zsh"));
        } else {
            let zsh = match which::which("zsh") {
                Ok(path) => path,
                Err(_) => {
                    ctx.log.warn("zsh disappeared from PATH, skipping chsh");
                    stats.skipped += 1;
                    return Ok(());
                }
            };
            let zsh = zsh.to_string_lossy().into_owned();
            ctx.executor.run("sudo", &["chsh", "-s", &zsh, user])?;
            ctx.log.info(&format!("Changed login shell of {user} to {zsh}"));
        }
        stats.changed += 1;
        Ok(())
    }

    fn ensure_oh_my_zsh(&self, ctx: &Context, stats: &mut TaskStats) -> Result<()> {
        if ctx.home.join(".oh-my-zsh").is_dir() {
            ctx.log.debug("ok: oh-my-zsh already installed");
            stats.already_ok += 1;
            return Ok(());
        }

        if ctx.dry_run {
            ctx.log.dry_run("would install oh-my-zsh");
        } else {
            // RUNZSH/CHSH off: the installer must not drop into a shell or
            // fight the chsh done above; KEEP_ZSHRC protects a synced .zshrc.
            let script = format!(
                "RUNZSH=no CHSH=no KEEP_ZSHRC=yes sh -c \"$(curl -fsSL {OMZ_INSTALL_URL})\""
            );
            ctx.executor.run("sh", &["-c", &script])?;
            ctx.log.info("Installed oh-my-zsh");
        }
        stats.changed += 1;
        Ok(())
    }
}

/// The user's login shell from the passwd database, when resolvable.
fn login_shell(ctx: &Context, user: &str) -> Option<String> {
    let result = ctx.executor.run_unchecked("getent", &["passwd", user]).ok()?;
    if !result.success {
        return None;
    }
    let line = result.stdout.lines().next()?;
    line.rsplit(':').next().map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Os;
    use crate::tasks::test_helpers::TaskHarness;

    #[test]
    fn skips_off_linux() {
        let harness = TaskHarness::default().with_platform(Os::Other, false);
        assert!(!ConfigureShell.should_run(&harness.ctx()));
    }

    #[test]
    fn runs_on_linux() {
        let harness = TaskHarness::default();
        assert!(ConfigureShell.should_run(&harness.ctx()));
    }

    #[test]
    fn zsh_present_counts_already_ok() {
        let harness = TaskHarness::default().with_which(true);
        let mut stats = TaskStats::default();
        let proceed = ConfigureShell.ensure_zsh(&harness.ctx(), &mut stats).unwrap();
        assert!(proceed);
        assert_eq!(stats.already_ok, 1);
    }

    #[test]
    fn zsh_missing_off_fedora_skips() {
        let harness = TaskHarness::default()
            .with_platform(Os::Linux, false)
            .with_which(false);
        let mut stats = TaskStats::default();
        let proceed = ConfigureShell.ensure_zsh(&harness.ctx(), &mut stats).unwrap();
        assert!(!proceed);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn omz_already_installed_counts_already_ok() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join(".oh-my-zsh")).unwrap();
        let harness = TaskHarness::default()
            .with_which(true)
            .with_home(home.path().to_path_buf());
        let mut stats = TaskStats::default();
        ConfigureShell
            .ensure_oh_my_zsh(&harness.ctx(), &mut stats)
            .unwrap();
        assert_eq!(stats.already_ok, 1);
        assert_eq!(stats.changed, 0);
    }

    #[test]
    fn omz_missing_dry_run_counts_changed() {
        let home = tempfile::tempdir().unwrap();
        let harness = TaskHarness::default()
            .with_which(true)
            .with_home(home.path().to_path_buf())
            .with_dry_run();
        let mut stats = TaskStats::default();
        ConfigureShell
            .ensure_oh_my_zsh(&harness.ctx(), &mut stats)
            .unwrap();
        assert_eq!(stats.changed, 1);
    }
}
