//! SQL identifier utilities
//!
//! Generated bulk statements embed table and column names verbatim, so every
//! name coming from entity metadata is checked here first. Quoting is not an
//! option: quoted identifiers are case-sensitive on several of the supported
//! engines and would stop matching the catalog's upper-cased names.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use std::sync::OnceLock;

static IDENTIFIER_RE: OnceLock<Regex> = OnceLock::new();

/// Returns `true` when `name` is a plain, unquoted SQL identifier.
///
/// # Examples
/// ```
/// use bl_core::sql_utils::is_plain_identifier;
/// assert!(is_plain_identifier("ROW_SEQ"));
/// assert!(!is_plain_identifier("users; DROP TABLE x"));
/// ```
pub fn is_plain_identifier(name: &str) -> bool {
    IDENTIFIER_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$#]*$").expect("valid regex"))
        .is_match(name)
}

/// Validate a column name.
pub fn validate_column(name: &str) -> CoreResult<()> {
    if is_plain_identifier(name) {
        Ok(())
    } else {
        Err(CoreError::InvalidIdentifier {
            kind: "column",
            name: name.to_string(),
        })
    }
}

/// Validate a potentially schema-qualified table name (`schema.table`).
///
/// Each dot-separated component must be a plain identifier.
pub fn validate_table(name: &str) -> CoreResult<()> {
    if !name.is_empty() && name.split('.').all(is_plain_identifier) {
        Ok(())
    } else {
        Err(CoreError::InvalidIdentifier {
            kind: "table",
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
