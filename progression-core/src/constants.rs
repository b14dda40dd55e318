//! Centralized progression constants.
//!
//! The curve, the level cap and the XP reward amounts live here so every
//! consumer derives levels from the same numbers.

// =====================================================
// Level Curve
// =====================================================

/// Curve scale: xp_for_level(L) = round(XP_CURVE_SCALE * L^1.5) for L >= 2
pub const XP_CURVE_SCALE: u64 = 100;

/// First level. Reached with zero XP.
pub const MIN_LEVEL: u32 = 1;

/// Highest representable level. The curve stays below u64::MAX all the way up.
pub const MAX_LEVEL: u32 = u32::MAX;

/// Levels with hand-authored titles and messages
pub const AUTHORED_LEVELS: u32 = 10;

/// Upper bound for progress percentages
pub const MAX_PROGRESS_PERCENT: u8 = 100;

// =====================================================
// XP Rewards
// =====================================================

/// XP for completing a lab
pub const LAB_COMPLETION_XP: u64 = 100;

/// XP for completing a project
pub const PROJECT_COMPLETION_XP: u64 = 500;

/// XP for opening a forum thread
pub const FORUM_POST_XP: u64 = 25;

/// XP for replying in the forum
pub const FORUM_REPLY_XP: u64 = 10;
