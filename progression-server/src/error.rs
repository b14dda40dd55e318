//! Service error types

use progression_core::ProgressionError;

use crate::storage::repository::StorageError;

/// Failures surfaced to the caller of `ProgressionService`.
///
/// A duplicate badge award is not in here: it is an `AwardResult` with
/// `awarded: false`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Progression error: {0}")]
    Progression(#[from] ProgressionError),
    #[error("Account {0} not found")]
    AccountNotFound(i64),
    #[error("Unknown badge '{0}'")]
    UnknownBadge(String),
    #[error("Account {account_id} does not hold badge '{badge_id}'")]
    BadgeNotHeld { account_id: i64, badge_id: String },
    #[error("XP awards must be positive")]
    InvalidDelta,
}

pub type ServiceResult<T> = Result<T, ServiceError>;
