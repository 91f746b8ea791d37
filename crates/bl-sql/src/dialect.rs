//! Database dialects and selection from a connection identifier

use crate::error::{SqlError, SqlResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL syntax family of a supported database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Oracle Database
    Oracle,
    /// H2
    H2,
    /// Microsoft SQL Server
    SqlServer,
    /// PostgreSQL
    PostgreSql,
    /// IBM DB2
    Db2,
}

/// Known identifier prefixes, matched case-sensitively in order.
///
/// JDBC URLs come first; product names (as reported by connection
/// metadata) follow.
const IDENTIFIER_PREFIXES: &[(&str, Dialect)] = &[
    ("jdbc:oracle:", Dialect::Oracle),
    ("jdbc:h2:", Dialect::H2),
    ("jdbc:sqlserver:", Dialect::SqlServer),
    ("jdbc:postgresql:", Dialect::PostgreSql),
    ("jdbc:db2:", Dialect::Db2),
    ("Oracle", Dialect::Oracle),
    ("H2", Dialect::H2),
    ("Microsoft SQL Server", Dialect::SqlServer),
    ("PostgreSQL", Dialect::PostgreSql),
    ("DB2", Dialect::Db2),
];

/// Pick the dialect for a connection from its identifying URL or product name.
///
/// There is no fallback: an identifier matching none of the known prefixes
/// is a configuration error naming it.
///
/// # Examples
/// ```
/// use bl_sql::dialect::{select_dialect, Dialect};
/// assert_eq!(select_dialect("jdbc:h2:mem:test").unwrap(), Dialect::H2);
/// assert!(select_dialect("jdbc:mysql://localhost/db").is_err());
/// ```
pub fn select_dialect(identifier: &str) -> SqlResult<Dialect> {
    IDENTIFIER_PREFIXES
        .iter()
        .find(|(prefix, _)| identifier.starts_with(prefix))
        .map(|(prefix, dialect)| {
            log::debug!("Identifier matched '{}': using {} dialect", prefix, dialect);
            *dialect
        })
        .ok_or_else(|| SqlError::UnknownDialect(identifier.to_string()))
}

impl Dialect {
    /// All supported dialects
    pub const ALL: [Dialect; 5] = [
        Dialect::Oracle,
        Dialect::H2,
        Dialect::SqlServer,
        Dialect::PostgreSql,
        Dialect::Db2,
    ];

    /// Short lowercase name used in config and logs
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Oracle => "oracle",
            Dialect::H2 => "h2",
            Dialect::SqlServer => "sqlserver",
            Dialect::PostgreSql => "postgresql",
            Dialect::Db2 => "db2",
        }
    }

    /// Whether TRUNCATE must run outside an open transaction.
    ///
    /// DB2 rejects `TRUNCATE ... IMMEDIATE` unless it is the first statement
    /// of a unit of work, so callers roll back right before issuing it.
    pub fn truncate_requires_rollback(&self) -> bool {
        matches!(self, Dialect::Db2)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SqlError::UnknownDialect(s.to_string()))
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
