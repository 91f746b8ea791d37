//! SQL text resolution: query ids to literal source SELECT statements.

use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_newtype_string;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

define_newtype_string! {
    /// Identifier of a source query in the job file.
    pub struct QueryId;
}

/// Where the text of a source query lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuerySource {
    /// SQL written directly in the job file
    Inline(String),
    /// SQL stored in a file, relative to the job file's directory
    File {
        /// Path to the `.sql` file
        file: PathBuf,
    },
}

/// Resolves query ids to SQL text.
pub trait QueryCatalog: Send + Sync {
    /// Return the literal SQL for `id`.
    ///
    /// Unknown ids fail with [`CoreError::UnknownQuery`].
    fn sql(&self, id: &str) -> CoreResult<&str>;
}

/// Query catalog with all file-backed queries loaded eagerly
#[derive(Debug, Clone, Default)]
pub struct QueryRegistry {
    queries: BTreeMap<QueryId, String>,
}

impl QueryRegistry {
    /// Build the registry, reading file-backed queries relative to `root`.
    pub fn load(sources: &BTreeMap<QueryId, QuerySource>, root: &Path) -> CoreResult<Self> {
        let mut queries = BTreeMap::new();
        for (id, source) in sources {
            let sql = match source {
                QuerySource::Inline(sql) => sql.clone(),
                QuerySource::File { file } => {
                    let path = if file.is_absolute() {
                        file.clone()
                    } else {
                        root.join(file)
                    };
                    std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                        path: path.display().to_string(),
                        source: e,
                    })?
                }
            };
            let sql = trim_statement(&sql);
            if sql.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Query '{}' is empty", id),
                });
            }
            queries.insert(id.clone(), sql.to_string());
        }
        Ok(Self { queries })
    }

    /// Register one query, replacing any previous text for its id.
    pub fn insert(&mut self, id: QueryId, sql: impl Into<String>) {
        self.queries.insert(id, sql.into());
    }

    /// Number of registered queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether no query is registered.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl QueryCatalog for QueryRegistry {
    fn sql(&self, id: &str) -> CoreResult<&str> {
        self.queries
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| CoreError::UnknownQuery {
                query: id.to_string(),
            })
    }
}

/// Strip surrounding whitespace and a trailing `;`, which would otherwise end
/// up in the middle of the generated statement.
fn trim_statement(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
