use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};

/// Clone the configured source repositories into their targets.
///
/// A target directory that already exists is left alone, whatever its
/// contents; keeping clones up to date is the operator's business.
pub struct CloneRepositories;

impl Task for CloneRepositories {
    fn name(&self) -> &str {
        "Clone repositories"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.repos.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::default();

        for repo in &ctx.config.repos {
            let target = repo.target_path();

            if target.exists() {
                ctx.log
                    .debug(&format!("ok: {} (already present)", target.display()));
                stats.already_ok += 1;
                continue;
            }

            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would clone {} to {}", repo.src, target.display()));
                stats.changed += 1;
                continue;
            }

            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            git2::Repository::clone(&repo.src, &target)
                .with_context(|| format!("cloning {}", repo.src))?;
            ctx.log
                .info(&format!("Cloned {} to {}", repo.src, target.display()));
            stats.changed += 1;
        }

        Ok(stats.finish(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoSpec;
    use crate::tasks::test_helpers::{TaskHarness, empty_config};

    #[test]
    fn skips_with_no_repos() {
        let harness = TaskHarness::default();
        assert!(!CloneRepositories.should_run(&harness.ctx()));
    }

    #[test]
    fn existing_target_counts_already_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config();
        config.repos = vec![RepoSpec {
            target: dir.path().to_string_lossy().into_owned(),
            src: "https://example.com/notes.git".to_string(),
        }];
        let harness = TaskHarness::new(config);
        let result = CloneRepositories.run(&harness.ctx()).unwrap();
        assert_eq!(result, TaskResult::Ok);
    }

    #[test]
    fn dry_run_previews_missing_clone() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config();
        config.repos = vec![RepoSpec {
            target: dir.path().join("absent").to_string_lossy().into_owned(),
            src: "https://example.com/notes.git".to_string(),
        }];
        let harness = TaskHarness::new(config).with_dry_run();
        let result = CloneRepositories.run(&harness.ctx()).unwrap();
        assert_eq!(result, TaskResult::DryRun);
        assert!(!dir.path().join("absent").exists());
    }
}
