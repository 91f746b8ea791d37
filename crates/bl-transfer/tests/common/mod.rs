//! Database doubles for transfer scenarios

use async_trait::async_trait;
use bl_db::{Database, DbResult, DuckDbBackend};
use std::sync::Mutex;

/// A call the engine made on the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Execute {
        sql: String,
        params: Vec<u64>,
        rows: usize,
    },
    Commit,
    Rollback,
}

impl Event {
    pub fn is_commit(&self) -> bool {
        matches!(self, Event::Commit)
    }
}

#[derive(Default)]
struct Log(Mutex<Vec<Event>>);

impl Log {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    fn snapshot(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

/// Wraps a DuckDB backend and records executions and transaction control.
pub struct RecordingDb {
    pub inner: DuckDbBackend,
    log: Log,
}

impl RecordingDb {
    pub fn new(inner: DuckDbBackend) -> Self {
        Self {
            inner,
            log: Log::default(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.snapshot()
    }
}

#[async_trait]
impl Database for RecordingDb {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        let rows = self.inner.execute(sql).await?;
        self.log.push(Event::Execute {
            sql: sql.to_string(),
            params: vec![],
            rows,
        });
        Ok(rows)
    }

    async fn execute_with_params(&self, sql: &str, params: &[u64]) -> DbResult<usize> {
        let rows = self.inner.execute_with_params(sql, params).await?;
        self.log.push(Event::Execute {
            sql: sql.to_string(),
            params: params.to_vec(),
            rows,
        });
        Ok(rows)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql).await
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.inner.query_count(sql).await
    }

    async fn query_optional_i64(&self, sql: &str) -> DbResult<Option<i64>> {
        self.inner.query_optional_i64(sql).await
    }

    async fn commit(&self) -> DbResult<()> {
        self.log.push(Event::Commit);
        self.inner.commit().await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.log.push(Event::Rollback);
        self.inner.rollback().await
    }

    fn connection_identifier(&self) -> &str {
        self.inner.connection_identifier()
    }

    fn db_type(&self) -> &'static str {
        self.inner.db_type()
    }
}

/// Connection that runs nothing: every statement affects `rows` rows and
/// the watermark query returns `watermark`. Used for dialects DuckDB
/// cannot execute.
pub struct ScriptedDb {
    identifier: String,
    rows: usize,
    watermark: Option<i64>,
    log: Log,
}

impl ScriptedDb {
    pub fn new(identifier: &str, rows: usize, watermark: Option<i64>) -> Self {
        Self {
            identifier: identifier.to_string(),
            rows,
            watermark,
            log: Log::default(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.snapshot()
    }
}

#[async_trait]
impl Database for ScriptedDb {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_with_params(sql, &[]).await
    }

    async fn execute_with_params(&self, sql: &str, params: &[u64]) -> DbResult<usize> {
        self.log.push(Event::Execute {
            sql: sql.to_string(),
            params: params.to_vec(),
            rows: self.rows,
        });
        Ok(self.rows)
    }

    async fn execute_batch(&self, _sql: &str) -> DbResult<()> {
        Ok(())
    }

    async fn query_count(&self, _sql: &str) -> DbResult<usize> {
        Ok(self.rows)
    }

    async fn query_optional_i64(&self, _sql: &str) -> DbResult<Option<i64>> {
        Ok(self.watermark)
    }

    async fn commit(&self) -> DbResult<()> {
        self.log.push(Event::Commit);
        Ok(())
    }

    async fn rollback(&self) -> DbResult<()> {
        self.log.push(Event::Rollback);
        Ok(())
    }

    fn connection_identifier(&self) -> &str {
        &self.identifier
    }

    fn db_type(&self) -> &'static str {
        "scripted"
    }
}
