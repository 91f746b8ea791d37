//! Bulk upsert (MERGE) generation
//!
//! [`MergePlan`] decides which columns are matched, updated and inserted;
//! a [`MergeRenderer`] per dialect turns the plan into that engine's syntax.
//! SQL Server reuses the ANSI renderer wrapped in [`Terminated`].

use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::source::SourceQuery;
use crate::statement::GeneratedStatement;
use bl_core::TableEntity;
use std::collections::HashSet;

const TARGET_ALIAS: &str = "tgt";
const SOURCE_ALIAS: &str = "src";

/// Column roles for one upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Target table
    pub table: String,

    /// Columns matched with equality, in configured order
    pub join_columns: Vec<String>,

    /// Columns overwritten on matched rows: every target column that is
    /// neither a key nor a join column, in declaration order
    pub update_columns: Vec<String>,

    /// Every target column, in declaration order
    pub insert_columns: Vec<String>,
}

impl MergePlan {
    /// Build a plan, validating the join columns against the entity.
    ///
    /// Join columns must be non-empty, distinct, and target columns. Their
    /// spelling is normalized to the entity's declaration.
    pub fn new(entity: &TableEntity, join_columns: &[String]) -> SqlResult<Self> {
        let invalid = |message: String| SqlError::InvalidJoinColumns {
            table: entity.table.clone(),
            message,
        };

        if join_columns.is_empty() {
            return Err(invalid("at least one join column is required".to_string()));
        }

        let mut seen = HashSet::new();
        let mut joins = Vec::with_capacity(join_columns.len());
        for requested in join_columns {
            let column = entity
                .columns
                .iter()
                .find(|c| c.eq_ignore_ascii_case(requested))
                .ok_or_else(|| invalid(format!("'{requested}' is not a column of the target")))?;
            if !seen.insert(column.to_ascii_lowercase()) {
                return Err(invalid(format!("'{requested}' is listed more than once")));
            }
            joins.push(column.clone());
        }

        let update_columns = entity
            .columns
            .iter()
            .filter(|c| !seen.contains(&c.to_ascii_lowercase()) && !entity.is_key(c))
            .cloned()
            .collect();

        Ok(Self {
            table: entity.table.clone(),
            join_columns: joins,
            update_columns,
            insert_columns: entity.columns.clone(),
        })
    }

    /// Whether matched rows have anything to update
    pub fn has_updates(&self) -> bool {
        !self.update_columns.is_empty()
    }
}

/// Renders a merge plan in one dialect's syntax
pub trait MergeRenderer: Send + Sync {
    /// Produce the statement text for `plan` reading from `source`.
    fn render(&self, plan: &MergePlan, source: &str) -> String;
}

/// `MERGE INTO ... USING ... ON ... WHEN MATCHED ... WHEN NOT MATCHED ...`
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiMerge;

impl MergeRenderer for AnsiMerge {
    fn render(&self, plan: &MergePlan, source: &str) -> String {
        let on = plan
            .join_columns
            .iter()
            .map(|c| format!("{TARGET_ALIAS}.{c} = {SOURCE_ALIAS}.{c}"))
            .collect::<Vec<_>>()
            .join(" AND ");

        // The source sits on its own lines so a trailing line comment in it
        // cannot swallow the closing parenthesis.
        let mut sql = format!(
            "MERGE INTO {} {TARGET_ALIAS}\nUSING (\n{source}\n) {SOURCE_ALIAS}\nON ({on})",
            plan.table
        );

        if plan.has_updates() {
            let set = plan
                .update_columns
                .iter()
                .map(|c| format!("{TARGET_ALIAS}.{c} = {SOURCE_ALIAS}.{c}"))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!("\nWHEN MATCHED THEN UPDATE SET {set}"));
        }

        let values = plan
            .insert_columns
            .iter()
            .map(|c| format!("{SOURCE_ALIAS}.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(
            "\nWHEN NOT MATCHED THEN INSERT ({}) VALUES ({values})",
            plan.insert_columns.join(", ")
        ));
        sql
    }
}

/// `MERGE INTO target (cols) KEY (join cols) <select>`
///
/// The select is matched positionally against the column list.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedMerge;

impl MergeRenderer for KeyedMerge {
    fn render(&self, plan: &MergePlan, source: &str) -> String {
        format!(
            "MERGE INTO {} ({})\nKEY ({})\n{source}",
            plan.table,
            plan.insert_columns.join(", "),
            plan.join_columns.join(", ")
        )
    }
}

/// `INSERT ... ON CONFLICT (join cols) DO UPDATE SET col = excluded.col`
#[derive(Debug, Clone, Copy, Default)]
pub struct OnConflictUpsert;

impl MergeRenderer for OnConflictUpsert {
    fn render(&self, plan: &MergePlan, source: &str) -> String {
        let action = if plan.has_updates() {
            let set = plan
                .update_columns
                .iter()
                .map(|c| format!("{c} = excluded.{c}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("DO UPDATE SET {set}")
        } else {
            "DO NOTHING".to_string()
        };
        format!(
            "INSERT INTO {} ({})\n{source}\nON CONFLICT ({}) {action}",
            plan.table,
            plan.insert_columns.join(", "),
            plan.join_columns.join(", ")
        )
    }
}

/// Appends a statement terminator to another renderer's output
#[derive(Debug, Clone, Copy)]
pub struct Terminated<R> {
    inner: R,
    terminator: &'static str,
}

impl<R: MergeRenderer> Terminated<R> {
    /// Wrap `inner`, appending `terminator` to everything it renders
    pub fn new(inner: R, terminator: &'static str) -> Self {
        Self { inner, terminator }
    }
}

impl<R: MergeRenderer> MergeRenderer for Terminated<R> {
    fn render(&self, plan: &MergePlan, source: &str) -> String {
        let mut sql = self.inner.render(plan, source);
        sql.push_str(self.terminator);
        sql
    }
}

/// Renderer for a dialect
pub fn merge_renderer(dialect: Dialect) -> Box<dyn MergeRenderer> {
    match dialect {
        Dialect::Oracle | Dialect::Db2 => Box::new(AnsiMerge),
        Dialect::H2 => Box::new(KeyedMerge),
        Dialect::PostgreSql => Box::new(OnConflictUpsert),
        // SQL Server requires MERGE to be terminated
        Dialect::SqlServer => Box::new(Terminated::new(AnsiMerge, ";")),
    }
}

/// Generate the upsert statement for `plan` in `dialect`.
pub fn merge_statement(
    dialect: Dialect,
    plan: &MergePlan,
    source: &SourceQuery,
) -> GeneratedStatement {
    let sql = merge_renderer(dialect).render(plan, source.sql());
    log::debug!(
        "Generated {} upsert into {} on ({})",
        dialect,
        plan.table,
        plan.join_columns.join(", ")
    );
    GeneratedStatement::new(sql, source.placeholders())
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
