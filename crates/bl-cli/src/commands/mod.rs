//! Command implementations

pub(crate) mod common;
pub mod run;
pub mod sql;
pub mod validate;
