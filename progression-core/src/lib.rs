//! Learning Platform - Progression Core Library
//!
//! This crate provides the deterministic progression logic for the learning platform:
//! - XP curve (cumulative thresholds per level)
//! - Level derivation and progress-within-level snapshots
//! - Level metadata (hand-authored titles, generated fallback)
//! - Level-up detection with milestone badge unlocks
//! - Badge catalog (closed categories and rarities)
//! - XP sources (labs, projects, forum)
//! - Structured logging setup
//!
//! Everything here is pure and synchronous. Storage and orchestration live in
//! `progression-server`.

pub mod badges;
pub mod constants;
pub mod error;
pub mod levels;
pub mod logging;
pub mod rewards;

pub use badges::{Badge, BadgeCategory, BadgeRarity, UnlockCriteria};
pub use error::ProgressionError;
pub use levels::{
    detect_level_up, level_for_xp, level_metadata, level_progress, xp_for_level, LevelMetadata,
    LevelProgress, LevelUpEvent,
};
pub use rewards::XpSource;
