use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, InstallOpts};
use crate::exec::SystemExecutor;
use crate::logging::{Logger, TaskStatus};
use crate::tasks::{self, Context, Task};

/// Run the install command: the full bootstrap task sequence.
///
/// The sequence stops at the first failed task. Every task shells out to
/// system package managers and installers, so a failure usually poisons
/// everything downstream; the partial summary still shows what completed.
///
/// # Errors
///
/// Returns an error when configuration loading fails or a task fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Logger) -> Result<()> {
    let version = option_env!("BOOTSTRAP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("bootstrap {version}"));

    let setup = CommandSetup::init(global, log)?;
    let executor = SystemExecutor;
    let ctx = Context::new(
        &setup.config,
        &setup.platform,
        log,
        global.dry_run,
        global.home.clone(),
        &executor,
    )?;

    let all_tasks = tasks::all_install_tasks();
    let selected = select_tasks(&all_tasks, opts);

    let mut failed = false;
    for task in selected {
        if tasks::execute(task, &ctx) == TaskStatus::Failed {
            failed = true;
            break;
        }
    }

    log.print_summary();

    if failed {
        anyhow::bail!("a task failed, stopping");
    }
    Ok(())
}

/// Apply the `--only`/`--skip` filters by case-insensitive substring match on
/// task names. `--only` wins when both are given.
fn select_tasks<'a>(all_tasks: &'a [Box<dyn Task>], opts: &InstallOpts) -> Vec<&'a dyn Task> {
    all_tasks
        .iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !opts.only.is_empty() {
                return opts.only.iter().any(|o| name.contains(&o.to_lowercase()));
            }
            if !opts.skip.is_empty() {
                return !opts.skip.iter().any(|s| name.contains(&s.to_lowercase()));
            }
            true
        })
        .map(std::convert::AsRef::as_ref)
        .collect()
}
