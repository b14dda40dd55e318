//! PostgreSQL Repository Adapters
//!
//! Implements the Repository traits from `repository.rs` using PostgresStore
//! as the backend. Converts between SQL row types and domain records.

use async_trait::async_trait;
use std::sync::Arc;

use progression_core::error::xp_from_storage;

use super::postgres::{AccountRow, PostgresStore, UserBadgeRow};
use super::repository::*;

// ============================================================================
// Type Conversion Helpers
// ============================================================================

fn row_to_account(row: AccountRow) -> RepoResult<AccountRecord> {
    Ok(AccountRecord {
        id: row.id,
        username: row.username,
        total_xp: xp_from_storage(row.total_xp)?,
        created_at: row.created_at,
    })
}

fn row_to_user_badge(row: UserBadgeRow) -> UserBadgeRecord {
    UserBadgeRecord {
        account_id: row.account_id,
        badge_id: row.badge_id,
        earned_at: row.earned_at,
        is_displayed: row.is_displayed,
    }
}

// ============================================================================
// AccountRepo Adapter
// ============================================================================

pub struct PgAccountRepo {
    store: Arc<PostgresStore>,
}

impl PgAccountRepo {
    pub fn new(store: Arc<PostgresStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountRepo for PgAccountRepo {
    async fn create(&self, username: &str) -> RepoResult<AccountRecord> {
        row_to_account(self.store.create_account(username).await?)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<AccountRecord>> {
        self.store
            .get_account(id)
            .await?
            .map(row_to_account)
            .transpose()
    }

    async fn increment_xp(&self, id: i64, delta: u64) -> RepoResult<XpIncrement> {
        let signed_delta = i64::try_from(delta).map_err(|_| {
            StorageError::Constraint(format!("XP delta {} exceeds BIGINT", delta))
        })?;
        let new_total = self.store.increment_xp(id, signed_delta).await?;
        let new_xp = xp_from_storage(new_total)?;
        let previous_xp = new_xp.checked_sub(delta).ok_or_else(|| {
            StorageError::Constraint(format!("total_xp {} below delta {}", new_xp, delta))
        })?;

        Ok(XpIncrement {
            account_id: id,
            previous_xp,
            new_xp,
        })
    }
}

// ============================================================================
// BadgeRepo Adapter
// ============================================================================

pub struct PgBadgeRepo {
    store: Arc<PostgresStore>,
}

impl PgBadgeRepo {
    pub fn new(store: Arc<PostgresStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BadgeRepo for PgBadgeRepo {
    async fn insert_user_badge(
        &self,
        account_id: i64,
        badge_id: &str,
    ) -> RepoResult<UserBadgeRecord> {
        let row = self.store.insert_user_badge(account_id, badge_id).await?;
        Ok(row_to_user_badge(row))
    }

    async fn list_for_account(&self, account_id: i64) -> RepoResult<Vec<UserBadgeRecord>> {
        let rows = self.store.get_user_badges(account_id).await?;
        Ok(rows.into_iter().map(row_to_user_badge).collect())
    }

    async fn set_displayed(
        &self,
        account_id: i64,
        badge_id: &str,
        displayed: bool,
    ) -> RepoResult<()> {
        self.store
            .set_badge_displayed(account_id, badge_id, displayed)
            .await
    }
}
