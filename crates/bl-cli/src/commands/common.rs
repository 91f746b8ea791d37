//! Helpers shared by the commands

use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use bl_core::{DatabaseConfig, Job, JobConfig};
use bl_db::DuckDbBackend;
use bl_sql::{select_dialect, Dialect};
use bl_transfer::TransferError;
use std::fmt;
use std::path::Path;

/// Error type representing a non-zero process exit code.
///
/// Return `Err(ExitCode(N).into())` instead of calling
/// `std::process::exit(N)` so destructors run; `main` maps it to the
/// process status.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the command already reported the problem.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit status for configuration problems
pub(crate) const EXIT_CONFIG: i32 = 1;

/// Exit status for database execution failures
pub(crate) const EXIT_DATABASE: i32 = 4;

/// Exit status for a transfer error
pub(crate) fn exit_code_for(err: &TransferError) -> i32 {
    if err.is_configuration() {
        EXIT_CONFIG
    } else {
        EXIT_DATABASE
    }
}

/// Load the job named by `--config`, or the one in `--project-dir`.
pub(crate) fn load_job(global: &GlobalArgs) -> Result<Job> {
    let path = global.config.as_deref().unwrap_or(&global.project_dir);
    Job::load(Path::new(path)).with_context(|| format!("Failed to load job from {}", path))
}

/// Database settings for the selected target (`--target` or `BL_TARGET`)
pub(crate) fn database_config(job: &Job, global: &GlobalArgs) -> Result<DatabaseConfig> {
    let target = JobConfig::resolve_target(global.target.as_deref());
    if let Some(name) = &target {
        log::debug!("Using target '{}'", name);
    }
    Ok(job.config.get_database_config(target.as_deref())?)
}

/// Dialect from an explicit `--dialect` value, or from the identifier of
/// the configured database (which is not opened).
pub(crate) fn resolve_dialect(
    job: &Job,
    global: &GlobalArgs,
    requested: Option<&str>,
) -> Result<Dialect> {
    match requested {
        Some(name) => Ok(name.parse::<Dialect>()?),
        None => {
            let config = database_config(job, global)?;
            Ok(select_dialect(&DuckDbBackend::identifier_for(&config))?)
        }
    }
}

/// Split a comma-separated `--steps` value
pub(crate) fn parse_steps(steps: Option<&str>) -> Vec<String> {
    steps
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
