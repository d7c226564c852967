//! Tournament command implementation.

use super::output::{format_tournament_text, JsonTournamentResult, TournamentStats};
use super::{load_config, load_plans, seed_or_random, CliError, OutputFormat};
use crewplan::game::new_game;
use crewplan::tournament::{run_match, MatchConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

/// Arguments of the tournament command.
#[derive(Debug)]
pub(crate) struct TournamentArgs {
    /// Plan files, one per player.
    pub(crate) plans: Vec<PathBuf>,
    /// Optional game configuration file.
    pub(crate) config: Option<PathBuf>,
    /// Number of matches.
    pub(crate) games: u64,
    /// First seed; match `i` uses `seed + i`.
    pub(crate) seed: Option<u64>,
    /// Worker threads.
    pub(crate) threads: Option<usize>,
    /// Round limit per match.
    pub(crate) max_turns: Option<i64>,
    /// Output format.
    pub(crate) format: OutputFormat,
    /// Show a progress bar.
    pub(crate) progress: bool,
}

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded or the matches cannot start.
pub(crate) fn execute(args: &TournamentArgs) -> Result<(), CliError> {
    // Parse once, share across all matches
    let player_plans = load_plans(&args.plans)?;
    let names: Vec<String> = player_plans.iter().map(|p| p.name.clone()).collect();

    let mut config = MatchConfig {
        game: load_config(args.config.as_deref())?,
        ..MatchConfig::default()
    };
    if let Some(t) = args.max_turns {
        config.max_turns = t;
    }

    // Fail on a bad setup before spawning any work
    let base_seed = seed_or_random(args.seed);
    new_game(config.game, &names, base_seed).map_err(|e| CliError::new(e.to_string()))?;

    if let Some(num_threads) = args.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
    {
        warn!(%e, "thread pool already initialized");
    }

    let pb = if args.progress {
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        Some(ProgressBar::new(args.games).with_style(style))
    } else {
        None
    };

    let start = Instant::now();
    let num_players = player_plans.len();

    // Each thread accumulates into its own TournamentStats, merged at the end
    let stats = (0..args.games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(num_players),
            |mut local_stats, i| {
                let game_seed = base_seed.wrapping_add(i);
                match run_match(game_seed, &player_plans, &config) {
                    Ok(result) => local_stats.add_result(&result),
                    Err(e) => warn!(seed = game_seed, %e, "match failed"),
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local_stats
            },
        )
        .reduce(
            || TournamentStats::new(num_players),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match args.format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &names));
            println!();
            println!("Duration: {:.2}s ({games_per_sec:.0} games/sec)", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, &names);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
    }

    Ok(())
}
