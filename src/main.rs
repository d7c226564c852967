//! crewplan CLI - Command-line interface for running and checking plans.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// crewplan - A hex territory game played by plans
#[derive(Parser, Debug)]
#[command(name = "crewplan")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single match between plans
    Run {
        /// Plan files (2-8 plans required)
        #[arg(required = true, num_args = 2..=8)]
        plans: Vec<PathBuf>,

        /// Game configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum rounds (default: 1000)
        #[arg(short, long, default_value = "1000")]
        turns: i64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the header
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many seeded matches in parallel and aggregate statistics
    Tournament {
        /// Plan files (2-8 plans required)
        #[arg(required = true, num_args = 2..=8)]
        plans: Vec<PathBuf>,

        /// Game configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of matches to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum rounds per match (default: 1000)
        #[arg(short = 't', long)]
        max_turns: Option<i64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Check plan or configuration files for syntax errors
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Treat the files as game configurations
        #[arg(long)]
        config: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            plans,
            config,
            seed,
            turns,
            format,
            quiet,
        } => cli::run::execute(&plans, config.as_deref(), seed, turns, format, quiet),

        Commands::Tournament {
            plans,
            config,
            games,
            seed,
            threads,
            max_turns,
            format,
            progress,
        } => cli::tournament::execute(&cli::tournament::TournamentArgs {
            plans,
            config,
            games,
            seed,
            threads,
            max_turns,
            format,
            progress,
        }),

        Commands::Check { files, config } => cli::check::execute(&files, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
