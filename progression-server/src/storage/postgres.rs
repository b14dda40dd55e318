//! PostgreSQL Storage - Account XP and badge persistence
//!
//! Uses `sqlx` for async queries over a shared pool.
//!
//! ## Tables
//! - accounts (total_xp, atomically incremented)
//! - badges (static catalog)
//! - user_badges (composite primary key on account_id, badge_id)

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};

use super::migrations;
use super::repository::StorageError;

/// Progression tables behind a shared `PgPool`
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

/// Translate constraint failures into the storage error the service expects
fn map_constraint(err: sqlx::Error, what: &str) -> StorageError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            return StorageError::UniqueViolation(what.to_string());
        }
        if db.is_foreign_key_violation() {
            return StorageError::NotFound(what.to_string());
        }
        if db.is_check_violation() {
            return StorageError::Constraint(what.to_string());
        }
    }
    StorageError::Sqlx(err)
}

impl PostgresStore {
    /// Open a pool and bring the schema up to date
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!(max_connections, "Progression database pool ready");

        let store = Self::from_pool(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Reuse a pool owned by the host application. Migrations are not run.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending schema migrations in order.
    ///
    /// Each migration and its bookkeeping row commit in one transaction, so a
    /// failed migration leaves nothing half-applied.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS progression_schema_history (
                version TEXT PRIMARY KEY,
                installed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        )
        .execute(&self.pool)
        .await?;

        let installed: Vec<String> =
            sqlx::query_scalar("SELECT version FROM progression_schema_history")
                .fetch_all(&self.pool)
                .await?;

        for (version, sql) in migrations::get_migrations() {
            if installed.iter().any(|v| v == version) {
                debug!(version, "Schema migration already installed");
                continue;
            }

            let mut tx = self.pool.begin().await?;
            sqlx::raw_sql(sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| StorageError::Migration(format!("{}: {}", version, e)))?;
            sqlx::query("INSERT INTO progression_schema_history (version) VALUES ($1)")
                .bind(version)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            info!(version, "Schema migration installed");
        }

        Ok(())
    }

    // ========================================================================
    // Account Operations
    // ========================================================================

    pub async fn create_account(&self, username: &str) -> Result<AccountRow, StorageError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "INSERT INTO accounts (username) VALUES ($1)
             RETURNING id, username, total_xp, created_at",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint(e, &format!("username '{}'", username)))?;

        info!("Created account: {} (id={})", username, row.id);
        Ok(row)
    }

    pub async fn get_account(&self, id: i64) -> Result<Option<AccountRow>, StorageError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, total_xp, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Add XP in a single statement. Returns the post-increment total.
    ///
    /// Concurrent calls serialize on the row lock, so no increment is lost and
    /// each caller sees its own before/after pair.
    pub async fn increment_xp(&self, id: i64, delta: i64) -> Result<i64, StorageError> {
        let new_total: Option<i64> = sqlx::query_scalar(
            "UPDATE accounts SET total_xp = total_xp + $2
             WHERE id = $1
             RETURNING total_xp",
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint(e, &format!("total_xp for account {}", id)))?;

        new_total.ok_or_else(|| StorageError::NotFound(format!("account {}", id)))
    }

    // ========================================================================
    // Badge Operations
    // ========================================================================

    /// Insert catalog rows, leaving existing ones untouched
    pub async fn upsert_badge(
        &self,
        id: &str,
        name: &str,
        description: &str,
        category: &str,
        rarity: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "INSERT INTO badges (id, name, description, category, rarity)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(rarity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Plain insert: a second award of the same badge hits the primary key
    pub async fn insert_user_badge(
        &self,
        account_id: i64,
        badge_id: &str,
    ) -> Result<UserBadgeRow, StorageError> {
        let row = sqlx::query_as::<_, UserBadgeRow>(
            "INSERT INTO user_badges (account_id, badge_id)
             VALUES ($1, $2)
             RETURNING account_id, badge_id, earned_at, is_displayed",
        )
        .bind(account_id)
        .bind(badge_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint(e, &format!("user_badges ({}, {})", account_id, badge_id)))?;

        Ok(row)
    }

    pub async fn get_user_badges(
        &self,
        account_id: i64,
    ) -> Result<Vec<UserBadgeRow>, StorageError> {
        let rows = sqlx::query_as::<_, UserBadgeRow>(
            "SELECT account_id, badge_id, earned_at, is_displayed
             FROM user_badges WHERE account_id = $1
             ORDER BY earned_at, badge_id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn set_badge_displayed(
        &self,
        account_id: i64,
        badge_id: &str,
        displayed: bool,
    ) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE user_badges SET is_displayed = $3
             WHERE account_id = $1 AND badge_id = $2",
        )
        .bind(account_id)
        .bind(badge_id)
        .bind(displayed)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!(
                "user_badges ({}, {})",
                account_id, badge_id
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub username: String,
    pub total_xp: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserBadgeRow {
    pub account_id: i64,
    pub badge_id: String,
    pub earned_at: chrono::DateTime<chrono::Utc>,
    pub is_displayed: bool,
}
