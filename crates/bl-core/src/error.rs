//! Error types for bl-core

use thiserror::Error;

/// Core error type for Bulkline
///
/// Every variant is a configuration error: it is detected before any SQL
/// reaches the database and is never retried.
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Job file not found
    #[error("[E001] Job file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse job file
    #[error("[E002] Failed to parse job file {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: A step is missing a required field
    #[error("[E004] Missing required field '{field}' in job '{job}', step '{step}'")]
    MissingField {
        job: String,
        step: String,
        field: String,
    },

    /// E005: Chunk size is not a positive integer
    #[error("[E005] Invalid chunk size {value} in job '{job}', step '{step}': must be greater than 0")]
    InvalidChunkSize { job: String, step: String, value: i64 },

    /// E006: Entity id does not resolve to a mapped table
    #[error("[E006] Entity '{entity}' is not a mapped table")]
    UnmappedEntity { entity: String },

    /// E007: Query id does not resolve to SQL text
    #[error("[E007] Query '{query}' is not defined")]
    UnknownQuery { query: String },

    /// E008: Two step options cannot be combined
    #[error("[E008] Incompatible options in job '{job}', step '{step}': {message}")]
    IncompatibleOptions {
        job: String,
        step: String,
        message: String,
    },

    /// E009: Table or column name is not a plain SQL identifier
    #[error("[E009] Invalid {kind} identifier '{name}'")]
    InvalidIdentifier { kind: &'static str, name: String },

    /// E010: Two steps share a name
    #[error("[E010] Duplicate step name '{name}' in job '{job}'")]
    DuplicateStep { job: String, name: String },

    /// E011: IO error
    #[error("[E011] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E012: IO error with file path context
    #[error("[E012] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
