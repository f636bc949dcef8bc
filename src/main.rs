use anyhow::Result;
use clap::Parser;

use bootstrap_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init_subscriber(args.command.name(), args.verbose);
    let log = logging::Logger::with_log_file(args.command.name(), args.verbose);

    match args.command {
        cli::Command::Install(ref opts) => commands::install::run(&args.global, opts, &log),
        cli::Command::Sync => commands::sync::run(&args.global, &log),
        cli::Command::Version => {
            let version = option_env!("BOOTSTRAP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("bootstrap {version}");
            Ok(())
        }
    }
}
