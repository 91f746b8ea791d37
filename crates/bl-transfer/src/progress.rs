//! Progress records and sinks
//!
//! Orchestrators emit one record when the target is cleaned, one per
//! committed window, and one when the step's statement work is finished.

use serde::Serialize;
use std::sync::Mutex;

/// Job and step a record belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepContext {
    /// Job name
    pub job: String,

    /// Step name
    pub step: String,
}

impl StepContext {
    /// Create a context
    pub fn new(job: impl Into<String>, step: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            step: step.into(),
        }
    }
}

/// What happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Progress {
    /// Rows removed from the target before loading
    Cleaned { table: String, rows: usize },

    /// One window executed and committed
    Chunk {
        table: String,
        from: u64,
        to: u64,
        /// Rows affected by this window
        input: usize,
        /// Row sequences left after this window
        remaining: u64,
    },

    /// Statement work finished
    Completed { table: String, rows: usize },
}

impl Progress {
    /// Table the record is about
    pub fn table(&self) -> &str {
        match self {
            Progress::Cleaned { table, .. }
            | Progress::Chunk { table, .. }
            | Progress::Completed { table, .. } => table,
        }
    }
}

/// A progress event together with its context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressRecord {
    #[serde(flatten)]
    pub context: StepContext,

    #[serde(flatten)]
    pub progress: Progress,
}

/// Receives progress records
pub trait ProgressSink: Send + Sync {
    /// Deliver one record
    fn record(&self, context: &StepContext, progress: &Progress);
}

/// Writes each record as a structured log line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn record(&self, context: &StepContext, progress: &Progress) {
        match progress {
            Progress::Cleaned { table, rows } => log::info!(
                "job={} step={} table={} cleaned={}",
                context.job,
                context.step,
                table,
                rows
            ),
            Progress::Chunk {
                table,
                from,
                to,
                input,
                remaining,
            } => log::info!(
                "job={} step={} table={} window=[{},{}] input={} remaining={}",
                context.job,
                context.step,
                table,
                from,
                to,
                input,
                remaining
            ),
            Progress::Completed { table, rows } => log::info!(
                "job={} step={} table={} count={}",
                context.job,
                context.step,
                table,
                rows
            ),
        }
    }
}

/// Collects records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ProgressRecord>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far
    pub fn records(&self) -> Vec<ProgressRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for MemorySink {
    fn record(&self, context: &StepContext, progress: &Progress) {
        if let Ok(mut records) = self.records.lock() {
            records.push(ProgressRecord {
                context: context.clone(),
                progress: progress.clone(),
            });
        }
    }
}

/// Delivers every record to several sinks in order
pub struct FanOut<'a> {
    sinks: Vec<&'a dyn ProgressSink>,
}

impl<'a> FanOut<'a> {
    /// Combine sinks
    pub fn new(sinks: Vec<&'a dyn ProgressSink>) -> Self {
        Self { sinks }
    }
}

impl ProgressSink for FanOut<'_> {
    fn record(&self, context: &StepContext, progress: &Progress) {
        for sink in &self.sinks {
            sink.record(context, progress);
        }
    }
}

#[cfg(test)]
#[path = "progress_test.rs"]
mod tests;
