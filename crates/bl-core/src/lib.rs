//! bl-core - Core library for Bulkline
//!
//! This crate provides the job configuration model, the entity metadata and
//! query text catalogs the transfer engine consumes, and identifier helpers
//! shared by the SQL generators.

pub mod config;
pub mod entity;
pub mod error;
pub mod job;
mod newtype_string;
pub mod query;
pub mod sql_utils;

pub use config::{
    ChunkConfig, CleanMode, DatabaseConfig, InsertMode, JobConfig, StepConfig, StepKind,
};
pub use entity::{EntityCatalog, EntityDef, EntityId, EntityRegistry, TableEntity};
pub use error::{CoreError, CoreResult};
pub use job::Job;
pub use query::{QueryCatalog, QueryId, QueryRegistry, QuerySource};
