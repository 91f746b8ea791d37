//! Job execution
//!
//! Every selected step is planned up front, so configuration errors surface
//! before any statement runs. Steps then execute in job order, each in its
//! own transaction: committed on success, rolled back on failure, and the
//! job stops at the first failure. Cancellation is only observed between
//! steps, never inside one.

use crate::error::{TransferError, TransferResult};
use crate::progress::ProgressSink;
use crate::step::{Catalogs, StepOutcome, TransferStep};
use bl_core::{Job, StepConfig, StepKind};
use bl_db::Database;
use bl_sql::{select_dialect, Dialect};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Summary of one executed step
#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    /// Step name
    pub name: String,

    /// Step kind
    pub kind: StepKind,

    #[serde(flatten)]
    pub outcome: StepOutcome,

    /// Wall-clock time in milliseconds
    pub duration_ms: u64,
}

/// Summary of a job run
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    /// Unique id of this run
    pub run_id: Uuid,

    /// Job name
    pub job: String,

    /// Dialect the statements were generated for
    pub dialect: Dialect,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock time in milliseconds
    pub duration_ms: u64,

    /// Executed steps, in order
    pub steps: Vec<StepSummary>,
}

impl JobSummary {
    /// Rows affected across all steps
    pub fn total_rows(&self) -> usize {
        self.steps.iter().map(|s| s.outcome.rows_affected).sum()
    }
}

/// Pick the steps to run: all of them when `only` is empty, otherwise the
/// named ones in job order.
pub fn select_steps<'j>(job: &'j Job, only: &[String]) -> TransferResult<Vec<&'j StepConfig>> {
    for name in only {
        if job.config.get_step(name).is_none() {
            return Err(TransferError::UnknownStep {
                job: job.name().to_string(),
                step: name.clone(),
                available: job
                    .config
                    .steps
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
    }

    Ok(job
        .config
        .steps
        .iter()
        .filter(|s| only.is_empty() || only.contains(&s.name))
        .collect())
}

/// Validate the selected steps and generate their statements.
pub fn plan_steps(
    job: &Job,
    dialect: Dialect,
    only: &[String],
) -> TransferResult<Vec<TransferStep>> {
    let catalogs = Catalogs {
        entities: &job.entities,
        queries: &job.queries,
    };
    select_steps(job, only)?
        .into_iter()
        .map(|step| TransferStep::plan(job.name(), step, dialect, catalogs))
        .collect()
}

/// Validate every step, collecting each failing step's error instead of
/// stopping at the first.
pub fn validate_steps(job: &Job, dialect: Dialect) -> Vec<(String, TransferError)> {
    let catalogs = Catalogs {
        entities: &job.entities,
        queries: &job.queries,
    };
    job.config
        .steps
        .iter()
        .filter_map(|step| {
            TransferStep::plan(job.name(), step, dialect, catalogs)
                .err()
                .map(|e| (step.name.clone(), e))
        })
        .collect()
}

/// Runs a job's steps against one connection
pub struct JobRunner<'a> {
    job: &'a Job,
    db: &'a dyn Database,
    sink: &'a dyn ProgressSink,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> JobRunner<'a> {
    /// Create a runner
    pub fn new(job: &'a Job, db: &'a dyn Database, sink: &'a dyn ProgressSink) -> Self {
        Self {
            job,
            db,
            sink,
            cancel: None,
        }
    }

    /// Stop before the next step once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Dialect of the connection
    pub fn dialect(&self) -> TransferResult<Dialect> {
        Ok(select_dialect(self.db.connection_identifier())?)
    }

    /// Run the selected steps (all when `only` is empty).
    pub async fn run(&self, only: &[String]) -> TransferResult<JobSummary> {
        let dialect = self.dialect()?;
        let steps = plan_steps(self.job, dialect, only)?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();
        log::info!(
            "Run {} of job '{}': {} steps on {} ({})",
            run_id,
            self.job.name(),
            steps.len(),
            self.db.db_type(),
            dialect
        );

        let mut summaries = Vec::with_capacity(steps.len());
        for step in &steps {
            if self.cancelled() {
                return Err(TransferError::Cancelled {
                    job: self.job.name().to_string(),
                    completed: summaries.len(),
                });
            }
            let name = step.context().step.clone();
            let step_start = Instant::now();
            match step.process(self.db, self.sink).await {
                Ok(outcome) => {
                    self.db.commit().await?;
                    log::info!("Step '{}' finished: {}", name, outcome.status);
                    summaries.push(StepSummary {
                        name,
                        kind: step.kind(),
                        outcome,
                        duration_ms: step_start.elapsed().as_millis() as u64,
                    });
                }
                Err(err) => {
                    if let Err(rollback) = self.db.rollback().await {
                        log::warn!("Rollback after step '{}' failed: {}", name, rollback);
                    }
                    return Err(err);
                }
            }
        }

        Ok(JobSummary {
            run_id,
            job: self.job.name().to_string(),
            dialect,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            steps: summaries,
        })
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
