//! bl-transfer - Transfer engine for Bulkline
//!
//! This crate moves rows from a staging source into a target table with
//! set-based SQL. A replace step cleans the target and bulk inserts; a merge
//! step bulk upserts. Either runs as a single statement or, when chunked, as
//! a sequence of windows over the source's row-sequence column with a commit
//! after each window.

pub mod chunk;
pub mod error;
pub mod merge;
pub mod progress;
pub mod range;
pub mod replace;
pub mod runner;
pub mod step;

#[cfg(test)]
pub(crate) mod test_utils;

pub use chunk::{compute_upper_bound, resolve_chunk_plan, ChunkPlan};
pub use error::{TransferError, TransferResult};
pub use merge::MergeStep;
pub use progress::{FanOut, LogSink, MemorySink, Progress, ProgressRecord, ProgressSink, StepContext};
pub use range::Range;
pub use replace::ReplaceStep;
pub use runner::{plan_steps, select_steps, validate_steps, JobRunner, JobSummary, StepSummary};
pub use step::{Catalogs, CompletionStatus, StepOutcome, TransferStep};
