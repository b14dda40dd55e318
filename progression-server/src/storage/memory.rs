//! In-memory storage backend
//!
//! Same contract as PostgreSQL, kept in a single mutex-guarded map. Every
//! operation holds the lock for its whole read-modify-write, which gives the
//! atomic increment and the (account, badge) uniqueness the service relies on.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::repository::*;

#[derive(Default)]
struct MemoryState {
    next_account_id: i64,
    accounts: HashMap<i64, AccountRecord>,
    user_badges: HashMap<(i64, String), UserBadgeRecord>,
}

/// Process-local store shared by the memory repo adapters
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().accounts.len()
    }

    pub fn user_badge_count(&self) -> usize {
        self.state.lock().user_badges.len()
    }
}

/// Build a `StorageManager` backed entirely by memory
pub fn memory_storage() -> (StorageManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let manager = StorageManager {
        accounts: Arc::new(MemoryAccountRepo::new(store.clone())),
        badges: Arc::new(MemoryBadgeRepo::new(store.clone())),
    };
    (manager, store)
}

// ============================================================================
// Accounts
// ============================================================================

pub struct MemoryAccountRepo {
    store: Arc<MemoryStore>,
}

impl MemoryAccountRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountRepo for MemoryAccountRepo {
    async fn create(&self, username: &str) -> RepoResult<AccountRecord> {
        let mut state = self.store.state.lock();
        if state.accounts.values().any(|a| a.username == username) {
            return Err(StorageError::UniqueViolation(format!(
                "username '{}'",
                username
            )));
        }
        state.next_account_id += 1;
        let account = AccountRecord {
            id: state.next_account_id,
            username: username.to_string(),
            total_xp: 0,
            created_at: Utc::now(),
        };
        state.accounts.insert(account.id, account.clone());
        debug!("Created account: {} (id={})", username, account.id);
        Ok(account)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<AccountRecord>> {
        Ok(self.store.state.lock().accounts.get(&id).cloned())
    }

    async fn increment_xp(&self, id: i64, delta: u64) -> RepoResult<XpIncrement> {
        let mut state = self.store.state.lock();
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("account {}", id)))?;

        let previous_xp = account.total_xp;
        let new_xp = previous_xp.checked_add(delta).ok_or_else(|| {
            StorageError::Constraint(format!("total_xp overflow for account {}", id))
        })?;
        account.total_xp = new_xp;

        Ok(XpIncrement {
            account_id: id,
            previous_xp,
            new_xp,
        })
    }
}

// ============================================================================
// Badges
// ============================================================================

pub struct MemoryBadgeRepo {
    store: Arc<MemoryStore>,
}

impl MemoryBadgeRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BadgeRepo for MemoryBadgeRepo {
    async fn insert_user_badge(
        &self,
        account_id: i64,
        badge_id: &str,
    ) -> RepoResult<UserBadgeRecord> {
        let mut state = self.store.state.lock();
        if !state.accounts.contains_key(&account_id) {
            return Err(StorageError::NotFound(format!("account {}", account_id)));
        }

        let key = (account_id, badge_id.to_string());
        if state.user_badges.contains_key(&key) {
            return Err(StorageError::UniqueViolation(format!(
                "user_badges ({}, {})",
                account_id, badge_id
            )));
        }

        let record = UserBadgeRecord {
            account_id,
            badge_id: badge_id.to_string(),
            earned_at: Utc::now(),
            is_displayed: true,
        };
        state.user_badges.insert(key, record.clone());
        Ok(record)
    }

    async fn list_for_account(&self, account_id: i64) -> RepoResult<Vec<UserBadgeRecord>> {
        let state = self.store.state.lock();
        let mut badges: Vec<UserBadgeRecord> = state
            .user_badges
            .values()
            .filter(|b| b.account_id == account_id)
            .cloned()
            .collect();
        badges.sort_by(|a, b| {
            a.earned_at
                .cmp(&b.earned_at)
                .then_with(|| a.badge_id.cmp(&b.badge_id))
        });
        Ok(badges)
    }

    async fn set_displayed(
        &self,
        account_id: i64,
        badge_id: &str,
        displayed: bool,
    ) -> RepoResult<()> {
        let mut state = self.store.state.lock();
        match state
            .user_badges
            .get_mut(&(account_id, badge_id.to_string()))
        {
            Some(record) => {
                record.is_displayed = displayed;
                Ok(())
            }
            None => Err(StorageError::NotFound(format!(
                "user_badges ({}, {})",
                account_id, badge_id
            ))),
        }
    }
}
