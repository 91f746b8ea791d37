//! Generated statement type

use std::fmt;

/// SQL text plus the number of positional parameters it expects.
///
/// An arity of 2 means the statement binds an inclusive `from`/`to` window
/// on the row-sequence column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStatement {
    /// SQL text
    pub sql: String,

    /// Number of positional parameters
    pub arity: usize,
}

impl GeneratedStatement {
    /// Create a statement with an explicit arity
    pub fn new(sql: impl Into<String>, arity: usize) -> Self {
        Self {
            sql: sql.into(),
            arity,
        }
    }

    /// Whether the statement binds a `from`/`to` window
    pub fn is_ranged(&self) -> bool {
        self.arity == 2
    }
}

impl fmt::Display for GeneratedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
