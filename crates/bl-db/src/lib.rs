//! bl-db - Database abstraction layer for Bulkline
//!
//! This crate provides the `Database` trait the transfer engine drives and
//! a DuckDB implementation of it.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
