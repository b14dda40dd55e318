//! Database Migrations - PostgreSQL schema for progression data
//!
//! Only the fields the progression model reads or writes live here. The rest
//! of the account schema belongs to the auth service.

/// SQL migration for creating all tables
pub const MIGRATION_V1: &str = r#"
-- ============================================================================
-- Progression Schema v1
-- ============================================================================

-- ============================================================================
-- 1. Accounts
-- ============================================================================

CREATE TABLE IF NOT EXISTS accounts (
    id              BIGSERIAL PRIMARY KEY,
    username        VARCHAR(50) UNIQUE NOT NULL,
    -- Only ever incremented in place: total_xp = total_xp + delta
    total_xp        BIGINT NOT NULL DEFAULT 0 CHECK (total_xp >= 0),
    created_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
);

-- ============================================================================
-- 2. Badge Catalog (seeded from progression_core::badges)
-- ============================================================================

CREATE TABLE IF NOT EXISTS badges (
    id              VARCHAR(64) PRIMARY KEY,
    name            VARCHAR(100) NOT NULL,
    description     TEXT NOT NULL,
    category        VARCHAR(20) NOT NULL,
    rarity          VARCHAR(20) NOT NULL
);

-- ============================================================================
-- 3. Earned Badges
-- ============================================================================

CREATE TABLE IF NOT EXISTS user_badges (
    account_id      BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    badge_id        VARCHAR(64) NOT NULL REFERENCES badges(id),
    earned_at       TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
    is_displayed    BOOLEAN NOT NULL DEFAULT TRUE,

    -- At most one row per (account, badge); concurrent awards race on this key
    PRIMARY KEY (account_id, badge_id)
);

CREATE INDEX IF NOT EXISTS idx_user_badges_badge ON user_badges(badge_id);
"#;

/// Get all migration SQL statements in order
pub fn get_migrations() -> Vec<(&'static str, &'static str)> {
    vec![("v1_progression_schema", MIGRATION_V1)]
}
