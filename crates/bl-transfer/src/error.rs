//! Error types for bl-transfer

use bl_core::CoreError;
use bl_db::DbError;
use bl_sql::SqlError;
use thiserror::Error;

/// Transfer errors
///
/// Configuration failures (core, SQL generation, placeholder and step
/// selection problems) are raised before any statement executes. Database
/// failures are the engine's errors passed through unchanged.
#[derive(Error, Debug)]
pub enum TransferError {
    /// Job or step configuration error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Dialect or statement generation error
    #[error(transparent)]
    Sql(#[from] SqlError),

    /// Execution error from the database
    #[error(transparent)]
    Db(#[from] DbError),

    /// Source query placeholders do not fit the execution mode (T001)
    #[error("[T001] Query '{query}' in job '{job}', step '{step}' has {found} placeholders; {mode} execution binds {expected}")]
    PlaceholderMismatch {
        job: String,
        step: String,
        query: String,
        mode: &'static str,
        expected: usize,
        found: usize,
    },

    /// A selected step does not exist (T002)
    #[error("[T002] Step '{step}' not found in job '{job}'. Available steps: {available}")]
    UnknownStep {
        job: String,
        step: String,
        available: String,
    },

    /// The watermark is below the first window (T003)
    #[error("[T003] Watermark {value} of '{table}.{column}' is negative")]
    NegativeWatermark {
        table: String,
        column: String,
        value: i64,
    },

    /// The run was cancelled between steps (T004)
    #[error("[T004] Job '{job}' cancelled after {completed} completed steps")]
    Cancelled { job: String, completed: usize },

    /// A step names an entity that is not mapped (T005)
    #[error("[T005] Entity '{entity}' given as '{field}' in job '{job}', step '{step}' is not a mapped table")]
    UnmappedEntity {
        job: String,
        step: String,
        field: &'static str,
        entity: String,
    },

    /// Join columns do not fit the target (T006)
    #[error("[T006] Invalid join columns in job '{job}', step '{step}' for '{table}': {message}")]
    InvalidJoinColumns {
        job: String,
        step: String,
        table: String,
        message: String,
    },
}

impl TransferError {
    /// Whether the error was raised before any SQL executed
    pub fn is_configuration(&self) -> bool {
        match self {
            TransferError::Core(_)
            | TransferError::Sql(_)
            | TransferError::PlaceholderMismatch { .. }
            | TransferError::UnknownStep { .. }
            | TransferError::UnmappedEntity { .. }
            | TransferError::InvalidJoinColumns { .. } => true,
            TransferError::Db(_)
            | TransferError::NegativeWatermark { .. }
            | TransferError::Cancelled { .. } => false,
        }
    }
}

/// Result type alias for TransferError
pub type TransferResult<T> = Result<T, TransferError>;
