//! DuckDB database backend implementation
//!
//! DuckDB runs in auto-commit mode by default; the backend opens a
//! transaction before the first statement and keeps it open until
//! `commit` or `rollback`, so callers see the same unit-of-work behavior as
//! on a server database.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use bl_core::DatabaseConfig;
use duckdb::{params_from_iter, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Identifier prefix reported for DuckDB connections. DuckDB accepts the
/// PostgreSQL statement forms, so it is driven with that dialect.
const IDENTIFIER_PREFIX: &str = "jdbc:postgresql:duckdb:";

/// Connection plus whether a transaction is open on it
struct Session {
    conn: Connection,
    in_transaction: bool,
}

impl Session {
    fn begin_if_needed(&mut self) -> DbResult<()> {
        if !self.in_transaction {
            self.conn
                .execute_batch("BEGIN TRANSACTION")
                .map_err(|e| DbError::TransactionError {
                    action: "begin",
                    message: e.to_string(),
                })?;
            self.in_transaction = true;
        }
        Ok(())
    }

    fn finish(&mut self, action: &'static str, sql: &str) -> DbResult<()> {
        if !self.in_transaction {
            return Ok(());
        }
        // Whatever the outcome, the engine no longer has our transaction open.
        self.in_transaction = false;
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::TransactionError {
                action,
                message: e.to_string(),
            })
    }
}

/// DuckDB database backend
pub struct DuckDbBackend {
    session: Mutex<Session>,
    identifier: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::wrap(conn, ":memory:"))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::wrap(conn, &path.display().to_string()))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Open the database a job configuration points at.
    ///
    /// A configured `url` replaces the default identifier.
    pub fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let backend = Self::new(&config.path)?;
        Ok(match &config.url {
            Some(url) => backend.with_identifier(url.clone()),
            None => backend,
        })
    }

    /// Identifier a connection opened from `config` reports, without
    /// opening it
    pub fn identifier_for(config: &DatabaseConfig) -> String {
        config
            .url
            .clone()
            .unwrap_or_else(|| format!("{IDENTIFIER_PREFIX}{}", config.path))
    }

    /// Override the identifier used for dialect selection
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    fn wrap(conn: Connection, path: &str) -> Self {
        log::debug!("Opened DuckDB database at {}", path);
        Self {
            session: Mutex::new(Session {
                conn,
                in_transaction: false,
            }),
            identifier: format!("{IDENTIFIER_PREFIX}{path}"),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Session>> {
        self.session
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let mut session = self.lock()?;
        session.begin_if_needed()?;
        session.conn.execute(sql, []).map_err(DbError::from)
    }

    /// Execute a parameterized statement synchronously
    fn execute_with_params_sync(&self, sql: &str, params: &[u64]) -> DbResult<usize> {
        let mut session = self.lock()?;
        session.begin_if_needed()?;
        let mut stmt = session.conn.prepare(sql)?;
        let expected = stmt.parameter_count();
        if expected != params.len() {
            return Err(DbError::ParameterMismatch {
                expected,
                actual: params.len(),
            });
        }
        stmt.execute(params_from_iter(params.iter()))
            .map_err(DbError::from)
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let mut session = self.lock()?;
        session.begin_if_needed()?;
        session.conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Query count synchronously
    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let mut session = self.lock()?;
        session.begin_if_needed()?;
        let count: i64 =
            session
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }

    /// Single integer value synchronously
    fn query_optional_i64_sync(&self, sql: &str) -> DbResult<Option<i64>> {
        let mut session = self.lock()?;
        session.begin_if_needed()?;
        let value: Option<i64> = session.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(value)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_with_params(&self, sql: &str, params: &[u64]) -> DbResult<usize> {
        self.execute_with_params_sync(sql, params)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    async fn query_optional_i64(&self, sql: &str) -> DbResult<Option<i64>> {
        self.query_optional_i64_sync(sql)
    }

    async fn commit(&self) -> DbResult<()> {
        self.lock()?.finish("commit", "COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.lock()?.finish("rollback", "ROLLBACK")
    }

    fn connection_identifier(&self) -> &str {
        &self.identifier
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
