//! Merge orchestrator: bulk upsert from the source query.
//!
//! There is no clean phase. Target rows the source does not match are left
//! untouched.

use crate::chunk::{resolve_chunk_plan, ChunkPlan};
use crate::error::{TransferError, TransferResult};
use crate::progress::{ProgressSink, StepContext};
use crate::step::{
    execute_statement, inspect_source, required, resolve_entity, Catalogs, CompletionStatus,
    StepOutcome,
};
use bl_core::{CleanMode, CoreError, InsertMode, StepConfig};
use bl_db::Database;
use bl_sql::{merge_statement, Dialect, GeneratedStatement, MergePlan, SqlError};

/// A validated merge step
#[derive(Debug, Clone)]
pub struct MergeStep {
    context: StepContext,
    plan: MergePlan,
    dialect: Dialect,
    statement: GeneratedStatement,
    chunk: Option<ChunkPlan>,
}

impl MergeStep {
    /// Validate the step configuration and generate the dialect's upsert.
    pub fn plan(
        job: &str,
        step: &StepConfig,
        dialect: Dialect,
        catalogs: Catalogs<'_>,
    ) -> TransferResult<Self> {
        let name = step.name.as_str();
        let target = required(job, name, "target", step.target.as_deref())?;
        let query = required(job, name, "query", step.query.as_deref())?;
        if step.join_columns.is_empty() {
            return Err(CoreError::MissingField {
                job: job.to_string(),
                step: name.to_string(),
                field: "join_columns".to_string(),
            }
            .into());
        }

        let incompatible = |message: &str| CoreError::IncompatibleOptions {
            job: job.to_string(),
            step: name.to_string(),
            message: message.to_string(),
        };
        if step.insert_mode == Some(InsertMode::DirectPath) {
            return Err(incompatible("insert_mode only applies to replace steps").into());
        }
        if matches!(step.clean, Some(CleanMode::Delete | CleanMode::Truncate)) {
            return Err(incompatible("merge steps do not clean their target").into());
        }

        let entity = resolve_entity(job, name, "target", target, catalogs.entities)?;
        let plan = MergePlan::new(entity, &step.join_columns).map_err(|err| match err {
            SqlError::InvalidJoinColumns { table, message } => TransferError::InvalidJoinColumns {
                job: job.to_string(),
                step: name.to_string(),
                table,
                message,
            },
            other => other.into(),
        })?;
        let chunk = step
            .chunk
            .as_ref()
            .map(|c| resolve_chunk_plan(job, name, c, catalogs.entities))
            .transpose()?;
        let source = inspect_source(job, name, query, chunk.is_some(), catalogs.queries)?;
        let statement = merge_statement(dialect, &plan, &source);

        Ok(Self {
            context: StepContext::new(job, name),
            plan,
            dialect,
            statement,
            chunk,
        })
    }

    /// Job and step names
    pub fn context(&self) -> &StepContext {
        &self.context
    }

    /// Column roles of the upsert
    pub fn merge_plan(&self) -> &MergePlan {
        &self.plan
    }

    /// Dialect the statement was generated for
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The generated upsert
    pub fn statement(&self) -> &GeneratedStatement {
        &self.statement
    }

    /// Chunking settings, if the upsert runs in windows
    pub fn chunk(&self) -> Option<&ChunkPlan> {
        self.chunk.as_ref()
    }

    /// Statements in execution order
    pub fn statements(&self) -> Vec<String> {
        vec![self.statement.sql.clone()]
    }

    /// Run the upsert. Single-shot upserts are left uncommitted for the
    /// caller.
    pub async fn process(
        &self,
        db: &dyn Database,
        sink: &dyn ProgressSink,
    ) -> TransferResult<StepOutcome> {
        let table = self.plan.table.as_str();
        log::debug!("Step '{}' upsert:\n{}", self.context.step, self.statement);
        let (rows_affected, windows) = execute_statement(
            &self.context,
            table,
            &self.statement,
            self.chunk.as_ref(),
            db,
            sink,
        )
        .await?;
        log::info!(
            "Step '{}' merged {} rows into {} on ({})",
            self.context.step,
            rows_affected,
            table,
            self.plan.join_columns.join(", ")
        );

        Ok(StepOutcome {
            status: CompletionStatus::Success,
            table: table.to_string(),
            rows_cleaned: None,
            rows_affected,
            windows,
        })
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
