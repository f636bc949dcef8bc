use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the bootstrap engine.
#[derive(Parser, Debug)]
#[command(
    name = "bootstrap",
    about = "Declarative workstation bootstrap engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Path to the bootstrap config file (default: ./bootstrap.toml)
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the destination home directory
    #[arg(long, global = true)]
    pub home: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full bootstrap task list
    Install(InstallOpts),
    /// Reconcile the dotfiles tree into the home directory
    Sync,
    /// Print version information
    Version,
}

impl Command {
    /// Short name used for the log file.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Sync => "sync",
            Self::Version => "version",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Skip specific tasks
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only specific tasks
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install() {
        let cli = Cli::parse_from(["bootstrap", "install"]);
        assert!(matches!(cli.command, Command::Install(_)));
    }

    #[test]
    fn parse_install_with_config() {
        let cli = Cli::parse_from(["bootstrap", "--config", "/tmp/b.toml", "install"]);
        assert_eq!(
            cli.global.config,
            Some(std::path::PathBuf::from("/tmp/b.toml"))
        );
    }

    #[test]
    fn parse_install_dry_run() {
        let cli = Cli::parse_from(["bootstrap", "--dry-run", "install"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_install_dry_run_short() {
        let cli = Cli::parse_from(["bootstrap", "-d", "install"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_install_skip_tasks() {
        let cli = Cli::parse_from(["bootstrap", "install", "--skip", "packages,fonts"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected Install command");
        };
        assert_eq!(opts.skip, vec!["packages", "fonts"]);
    }

    #[test]
    fn parse_install_only_tasks() {
        let cli = Cli::parse_from(["bootstrap", "install", "--only", "dotfiles"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected Install command");
        };
        assert_eq!(opts.only, vec!["dotfiles"]);
    }

    #[test]
    fn parse_sync() {
        let cli = Cli::parse_from(["bootstrap", "sync"]);
        assert!(matches!(cli.command, Command::Sync));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["bootstrap", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["bootstrap", "-v", "install"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_home_override() {
        let cli = Cli::parse_from(["bootstrap", "--home", "/tmp/home", "sync"]);
        assert_eq!(cli.global.home, Some(std::path::PathBuf::from("/tmp/home")));
    }

    #[test]
    fn command_names() {
        assert_eq!(
            Cli::parse_from(["bootstrap", "sync"]).command.name(),
            "sync"
        );
        assert_eq!(
            Cli::parse_from(["bootstrap", "install"]).command.name(),
            "install"
        );
    }
}
