//! NFL season forecast CLI.

mod cli;
mod commands;
mod data;
mod error;
mod output;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> error::Result<()> {
    let cli = Cli::parse();

    // Load and validate the league roster up front.
    let league = data::load_league(cli.data.as_deref())?;

    match &cli.command {
        Commands::Rollforward(args) => commands::run_rollforward(args, &league, cli.format),
        Commands::Simulate(args) => commands::run_simulate(args, &league, cli.format),
        Commands::Evaluate(args) => commands::run_evaluate(args, cli.format),
        Commands::Teams(args) => commands::run_teams(args, &league, cli.format),
    }
}
