//! Shared step plumbing: catalogs, outcomes, validation helpers, and the
//! single-shot / chunked execution loop both orchestrators use.

use crate::chunk::{compute_upper_bound, ChunkPlan};
use crate::error::{TransferError, TransferResult};
use crate::merge::MergeStep;
use crate::progress::{Progress, ProgressSink, StepContext};
use crate::range::Range;
use crate::replace::ReplaceStep;
use bl_core::{
    CoreError, CoreResult, EntityCatalog, QueryCatalog, StepConfig, StepKind, TableEntity,
};
use bl_db::Database;
use bl_sql::{Dialect, GeneratedStatement, SourceQuery};
use serde::Serialize;
use std::fmt;

/// Metadata collaborators a step is planned against
#[derive(Clone, Copy)]
pub struct Catalogs<'a> {
    /// Entity id to mapped table
    pub entities: &'a dyn EntityCatalog,

    /// Query id to SQL text
    pub queries: &'a dyn QueryCatalog,
}

/// Completion status returned by a successful step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionStatus {
    #[serde(rename = "SUCCESS")]
    Success,
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionStatus::Success => write!(f, "SUCCESS"),
        }
    }
}

/// Result of processing one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub status: CompletionStatus,

    /// Target table
    pub table: String,

    /// Rows removed by the clean phase, when it ran and reports a count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_cleaned: Option<usize>,

    /// Rows affected by the load statement, summed over windows
    pub rows_affected: usize,

    /// Committed windows; 0 for single-shot execution
    pub windows: usize,
}

/// A validated step ready to execute
#[derive(Debug, Clone)]
pub enum TransferStep {
    Replace(ReplaceStep),
    Merge(MergeStep),
}

impl TransferStep {
    /// Validate `step` and generate its statements for `dialect`.
    pub fn plan(
        job: &str,
        step: &StepConfig,
        dialect: Dialect,
        catalogs: Catalogs<'_>,
    ) -> TransferResult<Self> {
        match step.kind {
            StepKind::Replace => ReplaceStep::plan(job, step, dialect, catalogs).map(Self::Replace),
            StepKind::Merge => MergeStep::plan(job, step, dialect, catalogs).map(Self::Merge),
        }
    }

    /// Job and step names
    pub fn context(&self) -> &StepContext {
        match self {
            TransferStep::Replace(s) => s.context(),
            TransferStep::Merge(s) => s.context(),
        }
    }

    /// Step kind
    pub fn kind(&self) -> StepKind {
        match self {
            TransferStep::Replace(_) => StepKind::Replace,
            TransferStep::Merge(_) => StepKind::Merge,
        }
    }

    /// Statements in execution order
    pub fn statements(&self) -> Vec<String> {
        match self {
            TransferStep::Replace(s) => s.statements(),
            TransferStep::Merge(s) => s.statements(),
        }
    }

    /// Whether the load runs in committed windows
    pub fn is_chunked(&self) -> bool {
        match self {
            TransferStep::Replace(s) => s.chunk().is_some(),
            TransferStep::Merge(s) => s.chunk().is_some(),
        }
    }

    /// Execute the step
    pub async fn process(
        &self,
        db: &dyn Database,
        sink: &dyn ProgressSink,
    ) -> TransferResult<StepOutcome> {
        match self {
            TransferStep::Replace(s) => s.process(db, sink).await,
            TransferStep::Merge(s) => s.process(db, sink).await,
        }
    }
}

/// Value of a required step field, or a missing-field error naming it.
pub(crate) fn required<'s>(
    job: &str,
    step: &str,
    field: &str,
    value: Option<&'s str>,
) -> CoreResult<&'s str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::MissingField {
            job: job.to_string(),
            step: step.to_string(),
            field: field.to_string(),
        })
}

/// Resolve the entity a step names in `field`.
pub(crate) fn resolve_entity<'c>(
    job: &str,
    step: &str,
    field: &'static str,
    id: &str,
    entities: &'c dyn EntityCatalog,
) -> TransferResult<&'c TableEntity> {
    entities.resolve(id).map_err(|err| match err {
        CoreError::UnmappedEntity { entity } => TransferError::UnmappedEntity {
            job: job.to_string(),
            step: step.to_string(),
            field,
            entity,
        },
        other => other.into(),
    })
}

/// Resolve and inspect a step's source query, checking that its
/// placeholders fit the execution mode.
pub(crate) fn inspect_source(
    job: &str,
    step: &str,
    query: &str,
    chunked: bool,
    queries: &dyn QueryCatalog,
) -> TransferResult<SourceQuery> {
    let source = SourceQuery::inspect(queries.sql(query)?)?;
    let (mode, expected) = if chunked {
        ("chunked", 2)
    } else {
        ("single-shot", 0)
    };
    if source.placeholders() != expected {
        return Err(TransferError::PlaceholderMismatch {
            job: job.to_string(),
            step: step.to_string(),
            query: query.to_string(),
            mode,
            expected,
            found: source.placeholders(),
        });
    }
    Ok(source)
}

/// Execute the load statement once, or once per window with a commit after
/// each, reporting progress. Returns (rows affected, windows committed).
///
/// Single-shot execution leaves the transaction open for the caller.
pub(crate) async fn execute_statement(
    context: &StepContext,
    table: &str,
    statement: &GeneratedStatement,
    chunk: Option<&ChunkPlan>,
    db: &dyn Database,
    sink: &dyn ProgressSink,
) -> TransferResult<(usize, usize)> {
    let (rows, windows) = match chunk {
        None => {
            let rows = db.execute(&statement.sql).await?;
            (rows, 0)
        }
        Some(plan) => {
            let upper = compute_upper_bound(db, plan).await?;
            let mut range = Range::new(plan.size, upper);
            log::info!(
                "Step '{}' loading {} in {} windows of {} (watermark {})",
                context.step,
                table,
                range.window_count(),
                plan.size,
                upper
            );

            let mut total = 0;
            let mut windows = 0;
            while range.advance() {
                let input = db
                    .execute_with_params(&statement.sql, &[range.from(), range.to()])
                    .await?;
                db.commit().await?;
                total += input;
                windows += 1;
                sink.record(
                    context,
                    &Progress::Chunk {
                        table: table.to_string(),
                        from: range.from(),
                        to: range.to(),
                        input,
                        remaining: range.remaining(),
                    },
                );
            }
            (total, windows)
        }
    };

    sink.record(
        context,
        &Progress::Completed {
            table: table.to_string(),
            rows,
        },
    );
    Ok((rows, windows))
}
