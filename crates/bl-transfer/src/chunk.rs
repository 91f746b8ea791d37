//! Chunk-size and watermark resolution

use crate::error::{TransferError, TransferResult};
use crate::step::resolve_entity;
use bl_core::sql_utils::validate_column;
use bl_core::{ChunkConfig, CoreError, EntityCatalog};
use bl_db::Database;
use bl_sql::max_watermark_sql;
use std::num::NonZeroU64;

/// Validated chunking settings for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Rows per window
    pub size: NonZeroU64,

    /// Table whose sequence column bounds the windows
    pub watermark_table: String,

    /// Monotonically assigned row-sequence column
    pub sequence_column: String,
}

/// Validate a step's chunk settings.
///
/// The size must be present and positive and the watermark must name a
/// mapped entity. The watermark is taken as configured; it is never derived
/// from the step's target.
pub fn resolve_chunk_plan(
    job: &str,
    step: &str,
    config: &ChunkConfig,
    entities: &dyn EntityCatalog,
) -> TransferResult<ChunkPlan> {
    let value = config.size.ok_or_else(|| CoreError::MissingField {
        job: job.to_string(),
        step: step.to_string(),
        field: "chunk.size".to_string(),
    })?;
    let size = u64::try_from(value)
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or_else(|| CoreError::InvalidChunkSize {
            job: job.to_string(),
            step: step.to_string(),
            value,
        })?;

    let watermark = config
        .watermark
        .as_deref()
        .ok_or_else(|| CoreError::MissingField {
            job: job.to_string(),
            step: step.to_string(),
            field: "chunk.watermark".to_string(),
        })?;
    let watermark_table = resolve_entity(job, step, "chunk.watermark", watermark, entities)?
        .table
        .clone();

    validate_column(&config.sequence_column)?;

    Ok(ChunkPlan {
        size,
        watermark_table,
        sequence_column: config.sequence_column.clone(),
    })
}

/// Compute the chunking domain's upper bound: the maximum row sequence in
/// the watermark table, or 0 when it is empty.
pub async fn compute_upper_bound(db: &dyn Database, plan: &ChunkPlan) -> TransferResult<u64> {
    let sql = max_watermark_sql(&plan.watermark_table, &plan.sequence_column)?;
    let max = db.query_optional_i64(&sql).await?.unwrap_or(0);
    let upper = u64::try_from(max).map_err(|_| TransferError::NegativeWatermark {
        table: plan.watermark_table.clone(),
        column: plan.sequence_column.clone(),
        value: max,
    })?;
    log::debug!(
        "Watermark of {}.{} is {}",
        plan.watermark_table,
        plan.sequence_column,
        upper
    );
    Ok(upper)
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod tests;
