//! Storage Layer - Unified data access for progression data
//!
//! Implements the Repository pattern with two interchangeable backends:
//! - **Memory**: single-process store for tests and embedding
//! - **PostgreSQL**: accounts, badge catalog, earned badges
//!
//! ## Architecture
//! ```text
//! [ProgressionService]
//!       ↓
//! [Repository Traits]
//!       ↓
//! ┌─────────────────┬────────────────────┐
//! │ MemoryStore     │ PostgresStore      │
//! │ + Memory*Repo   │ + Pg*Repo adapters │
//! └─────────────────┴────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let storage = storage::init_storage(&StorageConfig::from_env()?).await?;
//! let service = ProgressionService::new(storage);
//! ```

pub mod memory;
pub mod migrations;
pub mod postgres;
pub mod postgres_repo_adapter;
pub mod repository;
pub mod seed_data;

use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use self::postgres::PostgresStore;
use self::postgres_repo_adapter::*;
use self::repository::StorageManager;
use crate::config::{StorageBackend, StorageConfig};

/// Initialize the configured storage backend
///
/// PostgreSQL connects, runs migrations and seeds the badge catalog before the
/// manager is handed out.
pub async fn init_storage(config: &StorageConfig) -> anyhow::Result<StorageManager> {
    match config.backend {
        StorageBackend::Memory => {
            let (manager, _) = memory::memory_storage();
            info!("In-memory progression store initialized");
            Ok(manager)
        }
        StorageBackend::Postgres => {
            let pg = Arc::new(
                PostgresStore::new(&config.database_url, config.max_connections)
                    .await
                    .context("connecting to PostgreSQL")?,
            );
            seed_data::seed_badges(&pg)
                .await
                .context("seeding badge catalog")?;
            info!("PostgreSQL progression store initialized");

            Ok(StorageManager {
                accounts: Arc::new(PgAccountRepo::new(pg.clone())),
                badges: Arc::new(PgBadgeRepo::new(pg)),
            })
        }
    }
}
