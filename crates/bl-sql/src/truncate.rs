//! Statements that empty a target table

use crate::dialect::Dialect;
use bl_core::TableEntity;

/// Generate the statement that empties the entity's table.
///
/// DB2 needs `IMMEDIATE` and must run it as the first statement of a unit
/// of work (see [`Dialect::truncate_requires_rollback`]).
pub fn truncate_table(dialect: Dialect, entity: &TableEntity) -> String {
    match dialect {
        Dialect::Db2 => format!("TRUNCATE TABLE {} IMMEDIATE", entity.table),
        Dialect::Oracle | Dialect::H2 | Dialect::SqlServer | Dialect::PostgreSql => {
            format!("TRUNCATE TABLE {}", entity.table)
        }
    }
}

/// Generate `DELETE FROM <table>`, removing every row transactionally.
pub fn delete_all(entity: &TableEntity) -> String {
    format!("DELETE FROM {}", entity.table)
}

#[cfg(test)]
#[path = "truncate_test.rs"]
mod tests;
