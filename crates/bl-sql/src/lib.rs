//! bl-sql - SQL layer for Bulkline
//!
//! This crate picks the SQL dialect for a connection and generates the bulk
//! statements the transfer engine executes: INSERT ... SELECT, MERGE (or its
//! dialect equivalent) and TRUNCATE. Source queries are embedded verbatim;
//! they are tokenized to count placeholders but never rewritten.

pub mod dialect;
pub mod error;
pub mod insert;
pub mod merge;
pub mod source;
pub mod statement;
pub mod truncate;
pub mod watermark;

pub use dialect::{select_dialect, Dialect};
pub use error::{SqlError, SqlResult};
pub use insert::{insert_select, DIRECT_PATH_HINT};
pub use merge::{merge_renderer, merge_statement, MergePlan, MergeRenderer};
pub use source::SourceQuery;
pub use statement::GeneratedStatement;
pub use truncate::{delete_all, truncate_table};
pub use watermark::max_watermark_sql;
