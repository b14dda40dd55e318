//! Progression error types.

use thiserror::Error;

/// Caller mistakes detected by the progression engine.
///
/// Well-formed input never produces one of these: the level curve is total
/// over non-negative XP. Each variant means the caller passed something it
/// should not have, so nothing is clamped or silently repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("Invalid level {level}: levels start at 1")]
    InvalidLevel { level: u32 },
    #[error("Negative XP value {value}")]
    NegativeXp { value: i64 },
    #[error("XP decreased from {previous} to {new}")]
    XpDecreased { previous: u64, new: u64 },
}

pub type ProgressionResult<T> = Result<T, ProgressionError>;

/// Convert a signed storage value (e.g. a `BIGINT` column) into XP.
pub fn xp_from_storage(value: i64) -> ProgressionResult<u64> {
    u64::try_from(value).map_err(|_| ProgressionError::NegativeXp { value })
}
