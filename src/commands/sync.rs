use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::sync::{self, TerminalResolver};

/// Run the sync command: dotfile reconciliation only, no system tasks.
///
/// # Errors
///
/// Returns an error when configuration loading fails, the source tree is
/// missing, or a filesystem operation fails mid-walk.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    let home = match &global.home {
        Some(home) => home.clone(),
        None => dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("cannot determine the home directory"))?,
    };

    let source = setup.config.dotfiles_source();
    log.stage("Syncing dotfiles");
    log.info(&format!("{} -> {}", source.display(), home.display()));

    let mut resolver = TerminalResolver::stdio();
    let stats = sync::reconcile(&source, &home, &mut resolver, log, global.dry_run)?;

    log.info(&stats.summary());
    Ok(())
}
