//! Repository traits - abstraction layer for data access
//!
//! The progression service talks to storage only through these traits, so
//! the in-memory backend and PostgreSQL are interchangeable.
//!
//! Two guarantees every backend must provide:
//! - `increment_xp` is one atomic read-modify-write and reports the values
//!   on both sides of it
//! - `insert_user_badge` fails with `StorageError::UniqueViolation` when the
//!   (account, badge) pair already exists

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use progression_core::ProgressionError;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("Constraint violation: {0}")]
    Constraint(String),
    #[error("Invalid stored value: {0}")]
    InvalidValue(#[from] ProgressionError),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRecord {
    pub id: i64,
    pub username: String,
    pub total_xp: u64,
    pub created_at: DateTime<Utc>,
}

/// XP on both sides of one atomic increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpIncrement {
    pub account_id: i64,
    pub previous_xp: u64,
    pub new_xp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserBadgeRecord {
    pub account_id: i64,
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
    pub is_displayed: bool,
}

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn create(&self, username: &str) -> RepoResult<AccountRecord>;
    async fn get(&self, id: i64) -> RepoResult<Option<AccountRecord>>;
    /// Atomically add `delta` to `total_xp`. `NotFound` if the account is missing.
    async fn increment_xp(&self, id: i64, delta: u64) -> RepoResult<XpIncrement>;
}

// ============================================================================
// Badge Repository
// ============================================================================

#[async_trait]
pub trait BadgeRepo: Send + Sync {
    /// Insert a (account, badge) row. `UniqueViolation` if already held.
    async fn insert_user_badge(&self, account_id: i64, badge_id: &str)
        -> RepoResult<UserBadgeRecord>;
    async fn list_for_account(&self, account_id: i64) -> RepoResult<Vec<UserBadgeRecord>>;
    /// `NotFound` if the account does not hold the badge
    async fn set_displayed(&self, account_id: i64, badge_id: &str, displayed: bool)
        -> RepoResult<()>;
}

// ============================================================================
// Unified Storage Manager
// ============================================================================

/// Holds one repository per concern, shared across request handlers
#[derive(Clone)]
pub struct StorageManager {
    pub accounts: Arc<dyn AccountRepo>,
    pub badges: Arc<dyn BadgeRepo>,
}
