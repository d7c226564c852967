//! CLI command implementations for crewplan.

pub(crate) mod check;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::ValueEnum;
use crewplan::tournament::{PlayerPlan, TournamentError};
use crewplan::{Config, ConfigError};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

/// Output format for the `run` and `tournament` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<TournamentError> for CliError {
    fn from(e: TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// File name of `path`, for display.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| "unknown".to_string(), |n| n.to_string_lossy().to_string())
}

/// Read `path`, naming it in the error.
fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))
}

/// Read and parse every plan file.
pub(crate) fn load_plans(paths: &[impl AsRef<Path>]) -> Result<Vec<PlayerPlan>, CliError> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let src = read_source(path)?;
            PlayerPlan::parse(display_name(path), &src)
                .map_err(|e| CliError::new(format!("{}: {e}", path.display())))
        })
        .collect()
}

/// Read the configuration file, or fall back to the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let src = read_source(path)?;
    Config::load(&src).map_err(|e: ConfigError| CliError::new(format!("{}: {e}", path.display())))
}

/// Seed from the clock when none was given.
pub(crate) fn seed_or_random(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
            .unwrap_or(42)
    })
}
