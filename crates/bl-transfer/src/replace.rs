//! Replace orchestrator: clean the target, then bulk insert from the source
//! query.

use crate::chunk::{resolve_chunk_plan, ChunkPlan};
use crate::error::TransferResult;
use crate::progress::{Progress, ProgressSink, StepContext};
use crate::step::{
    execute_statement, inspect_source, required, resolve_entity, Catalogs, CompletionStatus,
    StepOutcome,
};
use bl_core::{CleanMode, CoreError, InsertMode, StepConfig, TableEntity};
use bl_db::Database;
use bl_sql::{delete_all, insert_select, truncate_table, Dialect, GeneratedStatement};

/// A validated replace step
#[derive(Debug, Clone)]
pub struct ReplaceStep {
    context: StepContext,
    entity: TableEntity,
    dialect: Dialect,
    clean: CleanMode,
    statement: GeneratedStatement,
    chunk: Option<ChunkPlan>,
}

impl ReplaceStep {
    /// Validate the step configuration and generate its INSERT.
    ///
    /// Every check runs here, before any SQL reaches the database.
    pub fn plan(
        job: &str,
        step: &StepConfig,
        dialect: Dialect,
        catalogs: Catalogs<'_>,
    ) -> TransferResult<Self> {
        let name = step.name.as_str();
        let target = required(job, name, "target", step.target.as_deref())?;
        let query = required(job, name, "query", step.query.as_deref())?;

        let incompatible = |message: &str| CoreError::IncompatibleOptions {
            job: job.to_string(),
            step: name.to_string(),
            message: message.to_string(),
        };
        let insert_mode = step.insert_mode();
        if insert_mode == InsertMode::DirectPath && step.chunk.is_some() {
            return Err(incompatible("direct_path inserts cannot be chunked").into());
        }
        if !step.join_columns.is_empty() {
            return Err(incompatible("join_columns only apply to merge steps").into());
        }

        let entity = resolve_entity(job, name, "target", target, catalogs.entities)?.clone();
        let chunk = step
            .chunk
            .as_ref()
            .map(|c| resolve_chunk_plan(job, name, c, catalogs.entities))
            .transpose()?;
        let source = inspect_source(job, name, query, chunk.is_some(), catalogs.queries)?;
        let statement = insert_select(&entity, &source, insert_mode);

        Ok(Self {
            context: StepContext::new(job, name),
            entity,
            dialect,
            clean: step.clean_mode(),
            statement,
            chunk,
        })
    }

    /// Job and step names
    pub fn context(&self) -> &StepContext {
        &self.context
    }

    /// Target entity
    pub fn entity(&self) -> &TableEntity {
        &self.entity
    }

    /// The generated INSERT
    pub fn statement(&self) -> &GeneratedStatement {
        &self.statement
    }

    /// Chunking settings, if the load runs in windows
    pub fn chunk(&self) -> Option<&ChunkPlan> {
        self.chunk.as_ref()
    }

    /// The clean statement, if the step cleans
    pub fn clean_sql(&self) -> Option<String> {
        match self.clean {
            CleanMode::Delete => Some(delete_all(&self.entity)),
            CleanMode::Truncate => Some(truncate_table(self.dialect, &self.entity)),
            CleanMode::None => None,
        }
    }

    /// Statements in execution order
    pub fn statements(&self) -> Vec<String> {
        self.clean_sql()
            .into_iter()
            .chain(std::iter::once(self.statement.sql.clone()))
            .collect()
    }

    /// Clean the target and load it.
    ///
    /// The clean shares a transaction with the first window (or with the
    /// whole single-shot load). Single-shot loads are left uncommitted for
    /// the caller.
    pub async fn process(
        &self,
        db: &dyn Database,
        sink: &dyn ProgressSink,
    ) -> TransferResult<StepOutcome> {
        let table = self.entity.table.as_str();
        let rows_cleaned = self.clean_target(db, sink).await?;

        log::debug!("Step '{}' load:\n{}", self.context.step, self.statement);
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
            "Step '{}' inserted {} rows into {}",
            self.context.step,
            rows_affected,
            table
        );

        Ok(StepOutcome {
            status: CompletionStatus::Success,
            table: table.to_string(),
            rows_cleaned,
            rows_affected,
            windows,
        })
    }

    async fn clean_target(
        &self,
        db: &dyn Database,
        sink: &dyn ProgressSink,
    ) -> TransferResult<Option<usize>> {
        let table = self.entity.table.as_str();
        let rows = match self.clean {
            CleanMode::None => return Ok(None),
            CleanMode::Delete => db.execute(&delete_all(&self.entity)).await?,
            CleanMode::Truncate => {
                if self.dialect.truncate_requires_rollback() {
                    db.rollback().await?;
                }
                db.execute(&truncate_table(self.dialect, &self.entity))
                    .await?
            }
        };
        log::info!("Step '{}' deleted {} rows from {}", self.context.step, rows, table);
        sink.record(
            &self.context,
            &Progress::Cleaned {
                table: table.to_string(),
                rows,
            },
        );
        Ok(Some(rows))
    }
}

#[cfg(test)]
#[path = "replace_test.rs"]
mod tests;
