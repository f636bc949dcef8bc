pub mod install;
pub mod sync;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::logging::Logger;
use crate::platform::Platform;

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates platform detection and configuration loading so the
/// individual commands do not repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    pub platform: Platform,
    pub config: Config,
}

impl CommandSetup {
    /// Detect the platform, resolve the config path, and load the
    /// configuration, surfacing validation warnings.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be located, read,
    /// or parsed.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let platform = Platform::detect();
        let path = resolve_config(global)?;

        log.stage("Loading configuration");
        log.info(&format!("config: {}", path.display()));
        let config = Config::load(&path)?;

        log.debug(&format!("{} packages", config.packages.len()));
        log.debug(&format!("{} package groups", config.groups.len()));
        log.debug(&format!("{} repositories", config.repos.len()));
        log.debug(&format!("{} toolchains", config.toolchains.len()));
        log.debug(&format!(
            "{} github packages",
            config.github_packages.len()
        ));

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self { platform, config })
    }
}

/// Resolve the config file path from the CLI flag, the `BOOTSTRAP_CONFIG`
/// environment variable, or `./bootstrap.toml`.
///
/// # Errors
///
/// Returns an error when no candidate points at an existing file.
pub fn resolve_config(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(path) = &global.config {
        return Ok(path.clone());
    }

    if let Ok(path) = std::env::var("BOOTSTRAP_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("bootstrap.toml");
    if candidate.is_file() {
        return Ok(candidate);
    }

    anyhow::bail!(
        "cannot find bootstrap.toml. Use --config or set the BOOTSTRAP_CONFIG env var"
    );
}
