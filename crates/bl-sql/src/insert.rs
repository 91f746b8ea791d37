//! INSERT ... SELECT generation

use crate::source::SourceQuery;
use crate::statement::GeneratedStatement;
use bl_core::{InsertMode, TableEntity};

/// Optimizer hint requesting a direct-path (append) load.
///
/// Engines without optimizer hints read it as a comment.
pub const DIRECT_PATH_HINT: &str = "/*+ APPEND */";

/// Generate `INSERT INTO <table> (<columns>) <source>`.
///
/// Columns are listed in the entity's declaration order. The source query
/// must project the same columns in the same order; that coupling cannot be
/// checked here.
pub fn insert_select(
    entity: &TableEntity,
    source: &SourceQuery,
    mode: InsertMode,
) -> GeneratedStatement {
    let insert = match mode {
        InsertMode::Normal => "INSERT".to_string(),
        InsertMode::DirectPath => format!("INSERT {DIRECT_PATH_HINT}"),
    };
    let sql = format!(
        "{insert} INTO {} ({})\n{}",
        entity.table,
        entity.columns.join(", "),
        source.sql()
    );
    GeneratedStatement::new(sql, source.placeholders())
}

#[cfg(test)]
#[path = "insert_test.rs"]
mod tests;
