use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use fhirtime_core::BenchError;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins, then FHIRTIME_LOG, then the -v count
    let log_level = std::env::var("FHIRTIME_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<BenchError>() {
            Some(BenchError::Configuration(_)) => 2,
            Some(BenchError::Io(_)) => 3,
            Some(BenchError::Transport(_)) => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let session = cli::commands::Session::from_cli(&cli)?;

    match cli.command {
        Commands::Search(args) => cli::commands::search::run(args, &session),
        Commands::Time(args) => cli::commands::time::run(args, &session),
    }
}
