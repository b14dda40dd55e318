//! Seed Data - Badge catalog rows for PostgreSQL
//!
//! `user_badges.badge_id` references `badges(id)`, so the static catalog from
//! `progression_core::badges` must be present before any award.

use progression_core::badges::{badge_catalog, Badge};
use tracing::info;

use super::postgres::PostgresStore;
use super::repository::StorageError;

/// Column values for one catalog row
pub fn badge_row(badge: &Badge) -> [&'static str; 5] {
    [
        badge.id,
        badge.name,
        badge.description,
        badge.category.style().label,
        badge.rarity.style().label,
    ]
}

/// Insert every catalog badge that is not stored yet. Returns rows inserted.
pub async fn seed_badges(store: &PostgresStore) -> Result<usize, StorageError> {
    let mut inserted = 0;
    for badge in badge_catalog() {
        let [id, name, description, category, rarity] = badge_row(badge);
        if store
            .upsert_badge(id, name, description, category, rarity)
            .await?
        {
            inserted += 1;
        }
    }

    info!(
        "Seeded {} badges ({} in catalog)",
        inserted,
        badge_catalog().len()
    );
    Ok(inserted)
}
