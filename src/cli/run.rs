//! Run command implementation.

use super::output::{format_text, JsonMatchResult};
use super::{load_config, load_plans, seed_or_random, CliError, OutputFormat};
use crewplan::tournament::{run_match, MatchConfig};
use std::path::{Path, PathBuf};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded or the match cannot start.
pub(crate) fn execute(
    plans: &[PathBuf],
    config: Option<&Path>,
    seed: Option<u64>,
    turns: i64,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let player_plans = load_plans(plans)?;
    let names: Vec<String> = player_plans.iter().map(|p| p.name.clone()).collect();

    let seed = seed_or_random(seed);
    let config = MatchConfig {
        max_turns: turns,
        game: load_config(config)?,
    };

    if !quiet && format == OutputFormat::Text {
        println!("Running match with seed {seed}...");
        println!("Players: {}", names.join(", "));
        println!();
    }

    let result = run_match(seed, &player_plans, &config)?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&result, &names));
        }
        OutputFormat::Json => {
            let json_result = JsonMatchResult::from_match_result(&result, &names);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
    }

    Ok(())
}
