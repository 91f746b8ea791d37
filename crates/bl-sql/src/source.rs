//! Source query inspection
//!
//! Source queries are embedded verbatim into generated statements, so they
//! are only tokenized here, never parsed into an AST: vendor-specific SELECT
//! syntax must pass through untouched.

use crate::error::{SqlError, SqlResult};
use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};

/// A source SELECT statement and the number of positional parameters it
/// declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    sql: String,
    placeholders: usize,
}

impl SourceQuery {
    /// Tokenize `sql`, check that it is a query, and count its placeholders.
    ///
    /// Placeholders inside string literals and comments are not counted.
    pub fn inspect(sql: &str) -> SqlResult<Self> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        let dialect = GenericDialect {};
        let tokens = Tokenizer::new(&dialect, sql)
            .tokenize()
            .map_err(|e| SqlError::Tokenize(e.to_string()))?;

        let first = tokens
            .iter()
            .find(|t| !matches!(t, Token::Whitespace(_)))
            .ok_or(SqlError::EmptySql)?;
        let is_query = match first {
            Token::Word(word) => matches!(word.keyword, Keyword::SELECT | Keyword::WITH),
            Token::LParen => true,
            _ => false,
        };
        if !is_query {
            return Err(SqlError::NotAQuery(leading_words(sql)));
        }

        let placeholders = tokens
            .iter()
            .filter(|t| matches!(t, Token::Placeholder(_)))
            .count();

        Ok(Self {
            sql: sql.to_string(),
            placeholders,
        })
    }

    /// The query text, trimmed
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of positional parameters
    pub fn placeholders(&self) -> usize {
        self.placeholders
    }
}

/// First few words of a statement, for error messages.
fn leading_words(sql: &str) -> String {
    sql.split_whitespace().take(3).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
