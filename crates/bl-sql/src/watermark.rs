//! Watermark query used by chunked transfers

use bl_core::sql_utils::{validate_column, validate_table};
use bl_core::CoreResult;

/// `SELECT MAX(<column>) FROM <table>`
///
/// An empty table yields NULL, which callers treat as a watermark of 0.
pub fn max_watermark_sql(table: &str, sequence_column: &str) -> CoreResult<String> {
    validate_table(table)?;
    validate_column(sequence_column)?;
    Ok(format!("SELECT MAX({sequence_column}) FROM {table}"))
}

#[cfg(test)]
#[path = "watermark_test.rs"]
mod tests;
