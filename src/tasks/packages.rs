use std::collections::HashSet;

use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};

/// Install dnf package groups.
pub struct InstallPackageGroups;

impl Task for InstallPackageGroups {
    fn name(&self) -> &str {
        "Install package groups"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.groups.is_empty() && ctx.platform.is_fedora && ctx.executor.which("dnf")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            for group in &ctx.config.groups {
                ctx.log.dry_run(&format!("would install group: {group}"));
            }
            return Ok(TaskResult::DryRun);
        }

        let mut args = vec!["dnf", "group", "install", "-y"];
        args.extend(ctx.config.groups.iter().map(String::as_str));
        ctx.executor.run("sudo", &args)?;
        Ok(TaskResult::Ok)
    }
}

/// Install the configured dnf packages, querying rpm first so reruns with
/// everything present issue no install command.
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &str {
        "Install packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.packages.is_empty() && ctx.platform.is_fedora && ctx.executor.which("dnf")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let installed = installed_package_names(ctx)?;
        let missing: Vec<&str> = ctx
            .config
            .packages
            .iter()
            .map(String::as_str)
            .filter(|p| !installed.contains(*p))
            .collect();

        let mut stats = TaskStats {
            already_ok: (ctx.config.packages.len() - missing.len()) as u32,
            ..TaskStats::default()
        };

        if missing.is_empty() {
            return Ok(stats.finish(ctx));
        }

        stats.changed = missing.len() as u32;
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would install: {}", missing.join(", ")));
        } else {
            let mut args = vec!["dnf", "install", "-y"];
            args.extend(&missing);
            ctx.executor.run("sudo", &args)?;
        }

        Ok(stats.finish(ctx))
    }
}

/// The set of rpm package names currently installed.
fn installed_package_names(ctx: &Context) -> Result<HashSet<String>> {
    let result = ctx
        .executor
        .run("rpm", &["-qa", "--queryformat", "%{NAME}\n"])?;
    Ok(result.stdout.lines().map(str::to_string).collect())
}

/// Install global npm packages.
pub struct InstallNpmPackages;

impl Task for InstallNpmPackages {
    fn name(&self) -> &str {
        "Install npm packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.npm_global.is_empty() && ctx.executor.which("npm")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            for pkg in &ctx.config.npm_global {
                ctx.log.dry_run(&format!("would install: npm -g {pkg}"));
            }
            return Ok(TaskResult::DryRun);
        }

        let mut args = vec!["install", "-g"];
        args.extend(ctx.config.npm_global.iter().map(String::as_str));
        ctx.executor.run("npm", &args)?;
        Ok(TaskResult::Ok)
    }
}

/// Install Go programs via `go install`.
pub struct InstallGoPackages;

impl Task for InstallGoPackages {
    fn name(&self) -> &str {
        "Install Go packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.go_install.is_empty() && ctx.executor.which("go")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        for pkg in &ctx.config.go_install {
            if ctx.dry_run {
                ctx.log.dry_run(&format!("would run: go install {pkg}"));
            } else {
                ctx.executor.run("go", &["install", pkg])?;
            }
        }

        if ctx.dry_run {
            Ok(TaskResult::DryRun)
        } else {
            Ok(TaskResult::Ok)
        }
    }
}
