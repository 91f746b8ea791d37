//! Error types for bl-sql

use thiserror::Error;

/// Statement generation and dialect resolution errors.
///
/// All variants are configuration errors: they are raised before any
/// generated SQL is executed.
#[derive(Error, Debug)]
pub enum SqlError {
    /// Connection identifier matches none of the supported engines (S001)
    #[error("[S001] Unrecognized database '{0}': expected a jdbc:oracle:, jdbc:h2:, jdbc:sqlserver:, jdbc:postgresql: or jdbc:db2: identifier")]
    UnknownDialect(String),

    /// Source SQL is empty (S002)
    #[error("[S002] Source query is empty")]
    EmptySql,

    /// Source SQL is not a SELECT (S003)
    #[error("[S003] Source query must be a SELECT, found: {0}")]
    NotAQuery(String),

    /// Source SQL could not be tokenized (S004)
    #[error("[S004] Source query could not be tokenized: {0}")]
    Tokenize(String),

    /// Join columns are empty, repeated, or not target columns (S005)
    #[error("[S005] Invalid join columns for '{table}': {message}")]
    InvalidJoinColumns { table: String, message: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
