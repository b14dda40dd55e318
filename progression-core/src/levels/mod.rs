//! Level System
//!
//! Converts an account's accumulated XP into a discrete level, a
//! progress-within-level snapshot and level-up events.
//!
//! The curve is cumulative: `xp_for_level(L)` is the total XP needed to
//! *reach* level L, not the XP needed on top of level L-1.
//!
//! | Level | XP required |
//! |-------|-------------|
//! | 1     | 0           |
//! | 2     | 283         |
//! | 5     | 1118        |
//! | 6     | 1470        |
//! | 10    | 3162        |
//!
//! Nothing in here stores state. Every snapshot is recomputed from `total_xp`.

mod metadata;

pub use metadata::{level_metadata, level_table, LevelMetadata};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::badges;
use crate::constants::{MAX_LEVEL, MAX_PROGRESS_PERCENT, MIN_LEVEL, XP_CURVE_SCALE};
use crate::error::{ProgressionError, ProgressionResult};

/// Cumulative XP required to reach `level`.
///
/// Level 1 is free. From level 2 on the value is `100 * level^1.5` rounded to
/// the nearest integer. Level 0 does not exist and is rejected.
pub fn xp_for_level(level: u32) -> ProgressionResult<u64> {
    if level < MIN_LEVEL {
        return Err(ProgressionError::InvalidLevel { level });
    }
    Ok(threshold(level))
}

/// Curve value for a level already known to be >= 1.
fn threshold(level: u32) -> u64 {
    if level <= MIN_LEVEL {
        return 0;
    }
    // 100 * L^1.5 == sqrt(100^2 * L^3), kept in integers so the table is exact
    let l = level as u128;
    let scale = XP_CURVE_SCALE as u128;
    let squared = scale * scale * l * l * l;
    let root = isqrt(squared);
    // sqrt(n) >= root + 0.5  <=>  n > root^2 + root
    let rounded = if squared > root * root + root {
        root + 1
    } else {
        root
    };
    rounded as u64
}

fn isqrt(n: u128) -> u128 {
    let mut root = (n as f64).sqrt() as u128;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// Highest level whose threshold is `<= total_xp`. Never below 1.
///
/// Doubles an upper bound until it overshoots, then binary-searches the
/// bracket. The curve is strictly increasing, so any `u64` resolves in a few
/// dozen curve evaluations.
pub fn level_for_xp(total_xp: u64) -> u32 {
    // invariant: threshold(low) <= total_xp
    let mut low = MIN_LEVEL;
    let mut high = MIN_LEVEL + 1;

    while threshold(high) <= total_xp {
        low = high;
        if high == MAX_LEVEL {
            return MAX_LEVEL;
        }
        high = high.saturating_mul(2);
    }

    // invariant: threshold(low) <= total_xp < threshold(high)
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if threshold(mid) <= total_xp {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

/// Derived view of where an account sits inside its current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub total_xp: u64,
    /// Threshold of the current level
    pub current_level_xp: u64,
    /// Threshold of the next level (equal to current at the level cap)
    pub next_level_xp: u64,
    /// 0-100, floored
    pub progress_percentage: u8,
}

impl LevelProgress {
    /// XP earned since reaching the current level
    pub fn xp_into_level(&self) -> u64 {
        self.total_xp.saturating_sub(self.current_level_xp)
    }

    /// XP still missing for the next level
    pub fn xp_to_next_level(&self) -> u64 {
        self.next_level_xp.saturating_sub(self.total_xp)
    }

    pub fn is_max_level(&self) -> bool {
        self.level == MAX_LEVEL
    }
}

/// Compute the progress snapshot for `total_xp`.
pub fn level_progress(total_xp: u64) -> LevelProgress {
    let level = level_for_xp(total_xp);
    let current_level_xp = threshold(level);
    let next_level_xp = level
        .checked_add(1)
        .map(threshold)
        .unwrap_or(current_level_xp);

    let span = next_level_xp.saturating_sub(current_level_xp);
    let progress_percentage = if span == 0 {
        MAX_PROGRESS_PERCENT
    } else {
        let earned = total_xp.saturating_sub(current_level_xp) as u128;
        let percent = earned * 100 / span as u128;
        percent.min(MAX_PROGRESS_PERCENT as u128) as u8
    };

    LevelProgress {
        level,
        total_xp,
        current_level_xp,
        next_level_xp,
        progress_percentage,
    }
}

/// Fired when an XP award crosses at least one level threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpEvent {
    pub previous_level: u32,
    pub new_level: u32,
    pub levels_gained: u32,
    /// Metadata of the level just reached
    pub metadata: LevelMetadata,
    /// Milestone badges for every level crossed by this award
    pub unlocked_badges: Vec<String>,
}

/// Compare levels before and after an award.
///
/// Must be fed the pre- and post-increment values returned by the storage
/// layer's atomic increment, once per award.
pub fn detect_level_up(previous_xp: u64, new_xp: u64) -> ProgressionResult<Option<LevelUpEvent>> {
    if new_xp < previous_xp {
        return Err(ProgressionError::XpDecreased {
            previous: previous_xp,
            new: new_xp,
        });
    }

    let previous_level = level_for_xp(previous_xp);
    let new_level = level_for_xp(new_xp);
    if new_level <= previous_level {
        debug!(
            target: "progression_core",
            previous_xp, new_xp, level = new_level, "No level change"
        );
        return Ok(None);
    }

    let metadata = level_metadata(new_level)?;
    let unlocked_badges = badges::badges_for_level_range(previous_level, new_level)
        .iter()
        .map(|b| b.id.to_string())
        .collect::<Vec<_>>();

    info!(
        target: "progression_core",
        previous_level,
        new_level,
        badges = unlocked_badges.len(),
        "Level up: {}",
        metadata.title
    );

    Ok(Some(LevelUpEvent {
        previous_level,
        new_level,
        levels_gained: new_level - previous_level,
        metadata,
        unlocked_badges,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_for_level_known_values() {
        assert_eq!(xp_for_level(1).unwrap(), 0);
        assert_eq!(xp_for_level(2).unwrap(), 283);
        assert_eq!(xp_for_level(3).unwrap(), 520);
        assert_eq!(xp_for_level(4).unwrap(), 800);
        assert_eq!(xp_for_level(5).unwrap(), 1118);
        assert_eq!(xp_for_level(6).unwrap(), 1470);
        assert_eq!(xp_for_level(9).unwrap(), 2700);
        assert_eq!(xp_for_level(10).unwrap(), 3162);
        assert_eq!(xp_for_level(100).unwrap(), 100_000);
    }

    #[test]
    fn test_xp_for_level_zero_rejected() {
        assert_eq!(
            xp_for_level(0),
            Err(ProgressionError::InvalidLevel { level: 0 })
        );
    }

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(282), 1);
        assert_eq!(level_for_xp(283), 2);
        assert_eq!(level_for_xp(1117), 4);
        assert_eq!(level_for_xp(1118), 5);
        assert_eq!(level_for_xp(1469), 5);
        assert_eq!(level_for_xp(1470), 6);
        assert_eq!(level_for_xp(100_000), 100);
    }

    #[test]
    fn test_level_for_xp_saturates() {
        assert_eq!(level_for_xp(u64::MAX), MAX_LEVEL);
    }

    #[test]
    fn test_level_progress_midway() {
        // Level 5: 1118..1470, 176 of 352 is exactly half
        let p = level_progress(1294);
        assert_eq!(p.level, 5);
        assert_eq!(p.current_level_xp, 1118);
        assert_eq!(p.next_level_xp, 1470);
        assert_eq!(p.progress_percentage, 50);
        assert_eq!(p.xp_into_level(), 176);
        assert_eq!(p.xp_to_next_level(), 176);
    }

    #[test]
    fn test_level_progress_floors() {
        // 1 of 283 is 0.35%
        assert_eq!(level_progress(1).progress_percentage, 0);
        // 282 of 283 is 99.6%
        assert_eq!(level_progress(282).progress_percentage, 99);
        assert_eq!(level_progress(283).progress_percentage, 0);
    }

    #[test]
    fn test_level_progress_at_cap() {
        let p = level_progress(u64::MAX);
        assert!(p.is_max_level());
        assert_eq!(p.next_level_xp, p.current_level_xp);
        assert_eq!(p.progress_percentage, 100);
    }

    #[test]
    fn test_detect_level_up_none_within_level() {
        assert_eq!(detect_level_up(1118, 1119).unwrap(), None);
        assert_eq!(detect_level_up(500, 500).unwrap(), None);
    }

    #[test]
    fn test_detect_level_up_crossing() {
        let event = detect_level_up(1469, 1471).unwrap().expect("crossed 1470");
        assert_eq!(event.previous_level, 5);
        assert_eq!(event.new_level, 6);
        assert_eq!(event.levels_gained, 1);
        assert_eq!(event.metadata.level, 6);
        assert!(event.unlocked_badges.is_empty());
    }

    #[test]
    fn test_detect_level_up_multi_level_unlocks_milestones() {
        let event = detect_level_up(0, 3162).unwrap().unwrap();
        assert_eq!(event.previous_level, 1);
        assert_eq!(event.new_level, 10);
        assert_eq!(event.levels_gained, 9);
        assert!(event.unlocked_badges.contains(&"level-5".to_string()));
        assert!(event.unlocked_badges.contains(&"level-10".to_string()));
    }

    #[test]
    fn test_detect_level_up_rejects_decrease() {
        assert_eq!(
            detect_level_up(200, 100),
            Err(ProgressionError::XpDecreased {
                previous: 200,
                new: 100
            })
        );
    }

    #[test]
    fn test_level_up_event_serialization() {
        let event = detect_level_up(1000, 1200).unwrap().unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"new_level\":5"));
        let restored: LevelUpEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }
}
