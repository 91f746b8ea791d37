//! Sql command implementation

use crate::cli::{GlobalArgs, SqlArgs};
use crate::commands::common::{exit_code_for, load_job, parse_steps, resolve_dialect, ExitCode};
use anyhow::Result;
use bl_transfer::plan_steps;

/// Execute the sql command
pub async fn execute(args: &SqlArgs, global: &GlobalArgs) -> Result<()> {
    let job = load_job(global)?;
    let dialect = resolve_dialect(&job, global, args.dialect.as_deref())?;
    let only = parse_steps(args.steps.as_deref());

    let steps = match plan_steps(&job, dialect, &only) {
        Ok(steps) => steps,
        Err(err) => {
            eprintln!("{}", err);
            return Err(ExitCode(exit_code_for(&err)).into());
        }
    };

    println!("-- job: {} ({})", job.name(), dialect);
    for step in &steps {
        println!();
        println!("-- step: {} [{}]", step.context().step, step.kind());
        if step.is_chunked() {
            println!("-- executed once per window, binding (from, to)");
        }
        for statement in step.statements() {
            println!("{}", statement);
        }
    }
    Ok(())
}
