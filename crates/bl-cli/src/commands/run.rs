//! Run command implementation

use crate::cli::{GlobalArgs, OutputFormat, RunArgs};
use crate::commands::common::{
    database_config, exit_code_for, load_job, parse_steps, ExitCode, EXIT_DATABASE,
};
use anyhow::Result;
use bl_db::DuckDbBackend;
use bl_transfer::{
    FanOut, JobRunner, JobSummary, LogSink, Progress, ProgressSink, StepContext,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Drives a progress bar from chunk records
struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    fn new(visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BarSink {
    fn record(&self, context: &StepContext, progress: &Progress) {
        match progress {
            Progress::Cleaned { .. } => {}
            Progress::Chunk { to, remaining, .. } => {
                self.bar.set_length(to + remaining);
                self.bar.set_position(*to);
                self.bar.set_message(format!("{} -> {}", context.step, progress.table()));
            }
            Progress::Completed { .. } => self.bar.reset(),
        }
    }
}

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let job = match load_job(global) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("{:#}", e);
            return Err(ExitCode(1).into());
        }
    };
    let db_config = database_config(&job, global)?;
    let db = match DuckDbBackend::from_config(&db_config) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database {}: {}", db_config.path, e);
            return Err(ExitCode(EXIT_DATABASE).into());
        }
    };

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupt received. Stopping after the current step...");
                flag.store(true, Ordering::SeqCst);
            }
        });
    }

    let text = args.output == OutputFormat::Text;
    let bar = BarSink::new(text && !args.quiet);
    let log_sink = LogSink;
    let sinks: Vec<&dyn ProgressSink> = vec![&log_sink, &bar];
    let sink = FanOut::new(sinks);

    let only = parse_steps(args.steps.as_deref());
    let result = JobRunner::new(&job, &db, &sink)
        .with_cancel_flag(cancel)
        .run(&only)
        .await;
    bar.finish();

    match result {
        Ok(summary) => {
            match args.output {
                OutputFormat::Text => print_summary(&summary, args.quiet),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("Job '{}' failed: {}", job.name(), err);
            Err(ExitCode(exit_code_for(&err)).into())
        }
    }
}

fn print_summary(summary: &JobSummary, quiet: bool) {
    if !quiet {
        println!(
            "Run {} of job '{}' ({}), started {}",
            summary.run_id,
            summary.job,
            summary.dialect,
            summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        for step in &summary.steps {
            let cleaned = step
                .outcome
                .rows_cleaned
                .map(|n| format!(", {} cleaned", n))
                .unwrap_or_default();
            let windows = if step.outcome.windows > 0 {
                format!(" in {} windows", step.outcome.windows)
            } else {
                String::new()
            };
            println!(
                "  \u{2713} {} [{}] {}: {} rows{}{} - {} [{}ms]",
                step.name,
                step.kind,
                step.outcome.table,
                step.outcome.rows_affected,
                windows,
                cleaned,
                step.outcome.status,
                step.duration_ms
            );
        }
    }
    println!(
        "Completed {} steps, {} rows in {}ms",
        summary.steps.len(),
        summary.total_rows(),
        summary.duration_ms
    );
}
