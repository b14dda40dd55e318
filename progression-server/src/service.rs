//! ProgressionService - XP awards, level-ups and badges
//!
//! Every XP-granting event (lab, project, forum) goes through `award_xp`:
//! 1. storage adds the delta in one atomic increment
//! 2. `detect_level_up` runs on the exact before/after pair it returned
//! 3. milestone badges from the level-up are awarded idempotently
//!
//! Badge awards never check-then-insert. They insert and treat a uniqueness
//! violation as "already held".
//!
//! Once the increment has committed, `award_xp` always returns the award.
//! A milestone insert that fails after that point is logged and left out of
//! `badges_awarded`; it never turns the committed award into an error.

use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};

use progression_core::badges::{eligible_badges, find_badge, AccountActivity};
use progression_core::{detect_level_up, level_metadata, level_progress};
use progression_core::{LevelMetadata, LevelProgress, LevelUpEvent, XpSource};

use crate::error::{ServiceError, ServiceResult};
use crate::storage::repository::{AccountRecord, StorageError, StorageManager, UserBadgeRecord};

/// The account a request acts on, passed explicitly into every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AccountContext {
    pub account_id: i64,
}

impl AccountContext {
    pub fn new(account_id: i64) -> Self {
        Self { account_id }
    }
}

/// Outcome of one XP award
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XpAward {
    pub source: XpSource,
    pub delta: u64,
    pub new_total_xp: u64,
    pub progress: LevelProgress,
    pub level_up: Option<LevelUpEvent>,
    /// Badges this award actually inserted (already-held ones are left out)
    pub badges_awarded: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AwardResult {
    pub awarded: bool,
}

/// Everything the presentation layer needs for a progress ring and badge shelf
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressProfile {
    pub account_id: i64,
    pub username: String,
    pub total_xp: u64,
    pub progress: LevelProgress,
    pub metadata: LevelMetadata,
    pub badges: Vec<UserBadgeRecord>,
}

pub struct ProgressionService {
    storage: StorageManager,
}

impl ProgressionService {
    pub fn new(storage: StorageManager) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    pub async fn register_account(&self, username: &str) -> ServiceResult<AccountRecord> {
        Ok(self.storage.accounts.create(username).await?)
    }

    /// Grant `delta` XP from `source` and report any level-up it caused.
    pub async fn award_xp(
        &self,
        ctx: &AccountContext,
        source: XpSource,
        delta: u64,
    ) -> ServiceResult<XpAward> {
        if delta == 0 {
            return Err(ServiceError::InvalidDelta);
        }
        let span = info_span!("award_xp", account_id = ctx.account_id, source = source.as_str());
        self.apply_award(ctx, source, delta).instrument(span).await
    }

    async fn apply_award(
        &self,
        ctx: &AccountContext,
        source: XpSource,
        delta: u64,
    ) -> ServiceResult<XpAward> {
        let increment = self
            .storage
            .accounts
            .increment_xp(ctx.account_id, delta)
            .await
            .map_err(|e| account_error(ctx, e))?;

        debug!(
            previous_xp = increment.previous_xp,
            new_xp = increment.new_xp,
            "XP awarded"
        );

        let level_up = detect_level_up(increment.previous_xp, increment.new_xp)?;

        let mut badges_awarded = Vec::new();
        if let Some(event) = &level_up {
            info!(
                account_id = ctx.account_id,
                new_level = event.new_level,
                "Account leveled up to {}",
                event.metadata.title
            );
            for badge_id in &event.unlocked_badges {
                match self.insert_badge(ctx, badge_id).await {
                    Ok(result) if result.awarded => badges_awarded.push(badge_id.clone()),
                    Ok(_) => {}
                    Err(e) => warn!(
                        account_id = ctx.account_id,
                        badge_id = badge_id.as_str(),
                        new_xp = increment.new_xp,
                        "Milestone badge not awarded: {}",
                        e
                    ),
                }
            }
        }

        Ok(XpAward {
            source,
            delta,
            new_total_xp: increment.new_xp,
            progress: level_progress(increment.new_xp),
            level_up,
            badges_awarded,
        })
    }

    /// `award_xp` with the source's base reward
    pub async fn award_source(
        &self,
        ctx: &AccountContext,
        source: XpSource,
    ) -> ServiceResult<XpAward> {
        self.award_xp(ctx, source, source.base_reward()).await
    }

    /// Award a catalog badge. Awarding one already held is a no-op.
    pub async fn award_badge(
        &self,
        ctx: &AccountContext,
        badge_id: &str,
    ) -> ServiceResult<AwardResult> {
        if find_badge(badge_id).is_none() {
            return Err(ServiceError::UnknownBadge(badge_id.to_string()));
        }
        self.insert_badge(ctx, badge_id).await
    }

    /// Award every activity badge the counters qualify for. Returns the new ones.
    pub async fn evaluate_activity_badges(
        &self,
        ctx: &AccountContext,
        activity: &AccountActivity,
    ) -> ServiceResult<Vec<String>> {
        let mut awarded = Vec::new();
        for badge in eligible_badges(activity) {
            if self.insert_badge(ctx, badge.id).await?.awarded {
                awarded.push(badge.id.to_string());
            }
        }
        Ok(awarded)
    }

    pub async fn profile(&self, ctx: &AccountContext) -> ServiceResult<ProgressProfile> {
        let account = self
            .storage
            .accounts
            .get(ctx.account_id)
            .await?
            .ok_or(ServiceError::AccountNotFound(ctx.account_id))?;

        let progress = level_progress(account.total_xp);
        let metadata = level_metadata(progress.level)?;
        let badges = self.storage.badges.list_for_account(ctx.account_id).await?;

        Ok(ProgressProfile {
            account_id: account.id,
            username: account.username,
            total_xp: account.total_xp,
            progress,
            metadata,
            badges,
        })
    }

    pub async fn set_badge_displayed(
        &self,
        ctx: &AccountContext,
        badge_id: &str,
        displayed: bool,
    ) -> ServiceResult<()> {
        match self
            .storage
            .badges
            .set_displayed(ctx.account_id, badge_id, displayed)
            .await
        {
            Ok(()) => Ok(()),
            Err(StorageError::NotFound(_)) => Err(ServiceError::BadgeNotHeld {
                account_id: ctx.account_id,
                badge_id: badge_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_badge(
        &self,
        ctx: &AccountContext,
        badge_id: &str,
    ) -> ServiceResult<AwardResult> {
        match self
            .storage
            .badges
            .insert_user_badge(ctx.account_id, badge_id)
            .await
        {
            Ok(_) => {
                info!(account_id = ctx.account_id, badge_id, "Badge earned");
                Ok(AwardResult { awarded: true })
            }
            Err(StorageError::UniqueViolation(_)) => {
                debug!(account_id = ctx.account_id, badge_id, "Badge already held");
                Ok(AwardResult { awarded: false })
            }
            Err(e) => Err(account_error(ctx, e)),
        }
    }
}

fn account_error(ctx: &AccountContext, err: StorageError) -> ServiceError {
    match err {
        StorageError::NotFound(_) => ServiceError::AccountNotFound(ctx.account_id),
        other => {
            warn!(account_id = ctx.account_id, "Storage failure: {}", other);
            ServiceError::Storage(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::memory_storage;

    async fn service_with_account() -> (ProgressionService, AccountContext) {
        let (storage, _) = memory_storage();
        let service = ProgressionService::new(storage);
        let account = service.register_account("learner").await.unwrap();
        (service, AccountContext::new(account.id))
    }

    #[tokio::test]
    async fn test_zero_delta_rejected() {
        let (service, ctx) = service_with_account().await;
        let err = service
            .award_xp(&ctx, XpSource::LabCompletion, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDelta));
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let (service, _) = service_with_account().await;
        let ghost = AccountContext::new(999);
        let err = service
            .award_source(&ghost, XpSource::ForumPost)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AccountNotFound(999)));
        assert!(matches!(
            service.profile(&ghost).await,
            Err(ServiceError::AccountNotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_unknown_badge() {
        let (service, ctx) = service_with_account().await;
        let err = service.award_badge(&ctx, "imaginary").await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownBadge(_)));
    }

    #[tokio::test]
    async fn test_award_source_uses_base_reward() {
        let (service, ctx) = service_with_account().await;
        let award = service
            .award_source(&ctx, XpSource::ProjectCompletion)
            .await
            .unwrap();
        assert_eq!(award.delta, 500);
        assert_eq!(award.new_total_xp, 500);
        assert_eq!(award.progress.level, 2);
    }

    #[tokio::test]
    async fn test_display_toggle_requires_badge() {
        let (service, ctx) = service_with_account().await;
        let err = service
            .set_badge_displayed(&ctx, "founder", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadgeNotHeld { .. }));
    }
}
