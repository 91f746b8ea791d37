//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Connection used by the transfer engine.
///
/// Statements run inside an implicit transaction that the first statement
/// after a `commit`/`rollback` opens, the way a JDBC connection with
/// auto-commit disabled behaves. Nothing becomes durable until `commit`.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a statement, returning the affected row count
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a statement binding `params` positionally, returning the
    /// affected row count
    async fn execute_with_params(&self, sql: &str, params: &[u64]) -> DbResult<usize>;

    /// Execute multiple statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Count the rows a query returns
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Run a single-value integer query; NULL maps to `None`
    async fn query_optional_i64(&self, sql: &str) -> DbResult<Option<i64>>;

    /// Commit the open transaction, if any
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction, if any
    async fn rollback(&self) -> DbResult<()>;

    /// URL or product name identifying the engine behind this connection
    fn connection_identifier(&self) -> &str;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
