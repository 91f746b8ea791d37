//! Validate command implementation

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{load_job, resolve_dialect, ExitCode, EXIT_CONFIG};
use anyhow::Result;
use bl_transfer::validate_steps;

/// Execute the validate command
pub async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let job = match load_job(global) {
        Ok(job) => job,
        Err(e) => {
            println!("[ERROR] {:#}", e);
            return Err(ExitCode(EXIT_CONFIG).into());
        }
    };
    let dialect = match resolve_dialect(&job, global, args.dialect.as_deref()) {
        Ok(dialect) => dialect,
        Err(e) => {
            println!("[ERROR] {:#}", e);
            return Err(ExitCode(EXIT_CONFIG).into());
        }
    };

    println!(
        "Validating job '{}' ({} steps, {} dialect)",
        job.name(),
        job.config.steps.len(),
        dialect
    );

    let problems = validate_steps(&job, dialect);
    for step in &job.config.steps {
        match problems.iter().find(|(name, _)| name == &step.name) {
            Some((_, err)) => println!("  \u{2717} {}: {}", step.name, err),
            None => println!("  \u{2713} {}", step.name),
        }
    }

    if problems.is_empty() {
        println!("No problems found");
        Ok(())
    } else {
        println!("{} of {} steps invalid", problems.len(), job.config.steps.len());
        Err(ExitCode(EXIT_CONFIG).into())
    }
}
