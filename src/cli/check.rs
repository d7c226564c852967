//! Check command implementation.

use super::{load_config, load_plans, CliError};
use std::path::PathBuf;

/// Execute the check command.
///
/// Every file is checked; all problems are reported before failing.
///
/// # Errors
///
/// Returns an error if any file fails to load or parse.
pub(crate) fn execute(files: &[PathBuf], config: bool) -> Result<(), CliError> {
    let mut failures = 0;

    for path in files {
        let outcome = if config {
            load_config(Some(path)).map(|_| ())
        } else {
            load_plans(std::slice::from_ref(path)).map(|_| ())
        };
        match outcome {
            Ok(()) => println!("{}: ok", path.display()),
            Err(e) => {
                eprintln!("{e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(CliError::new(format!("{failures} of {} files failed", files.len())));
    }
    Ok(())
}
