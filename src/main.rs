use std::process::ExitCode;

use clap::Parser;

use dploy::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Stow { sources, dest, ignore } => {
            dploy::stow(&sources, &dest, cli.silent, cli.dry_run, &ignore)
        }
        Command::Unstow { sources, dest, ignore } => {
            dploy::unstow(&sources, &dest, cli.silent, cli.dry_run, &ignore)
        }
        Command::Clean { sources, dest } => dploy::clean(&sources, &dest, cli.silent, cli.dry_run),
        Command::Link { source, dest } => dploy::link(&source, &dest, cli.silent, cli.dry_run),
    };

    // Errors are already reported to stderr by the executor (unless
    // --silent); main only needs to translate success/failure into an
    // exit code.
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
