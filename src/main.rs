use std::{io, process::ExitCode};

use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use gitprofile::{
    AppError, GitCli, ProfileStore,
    cli::Cli,
    commands, menu,
};

fn main() -> ExitCode {
    // Answers shell completion requests (`COMPLETE=<shell>`) and exits
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err.to_string().red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let store: ProfileStore = match cli.config {
        Some(path) => ProfileStore::at(path),
        None => ProfileStore::open_default()?,
    };
    let git = GitCli::new();

    match cli.command {
        Some(command) => commands::execute(command, &store, &git, &mut io::stdout().lock()),
        None => menu::run_menu(&store, &git),
    }
}

/// Logs to stderr, filtered by `RUST_LOG` unless `--verbose` is given
fn init_logging(verbose: bool) {
    let filter: EnvFilter = if verbose {
        EnvFilter::new("gitprofile=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
