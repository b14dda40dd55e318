//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL inputs:
//! - Curve: strictly increasing in level
//! - Round trip: a threshold belongs to the level it unlocks
//! - Levels: monotonic in XP, never below 1
//! - Progress: always within 0..=100 and consistent with the level bracket
//! - Level-up: fires exactly when the derived level changes

use proptest::prelude::*;
use progression_core::levels::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_curve_strictly_increasing(level in 1u32..1_000_000) {
        let here = xp_for_level(level).unwrap();
        let next = xp_for_level(level + 1).unwrap();
        prop_assert!(next > here, "xp_for_level({}) = {} not below {}", level + 1, next, here);
    }

    #[test]
    fn prop_round_trip(level in 1u32..5_000_000) {
        let xp = xp_for_level(level).unwrap();
        prop_assert_eq!(level_for_xp(xp), level);
        if xp > 0 {
            prop_assert_eq!(level_for_xp(xp - 1), level - 1);
        }
    }

    #[test]
    fn prop_level_monotonic(a in any::<u64>(), b in any::<u64>()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(level_for_xp(low) <= level_for_xp(high));
        prop_assert!(level_for_xp(low) >= 1);
    }

    #[test]
    fn prop_level_is_highest_reached(xp in 0u64..10_000_000_000) {
        let level = level_for_xp(xp);
        prop_assert!(xp_for_level(level).unwrap() <= xp);
        prop_assert!(xp_for_level(level + 1).unwrap() > xp);
    }

    #[test]
    fn prop_progress_bounded(xp in any::<u64>()) {
        let p = level_progress(xp);
        prop_assert!(p.progress_percentage <= 100);
        prop_assert!(p.current_level_xp <= xp);
        prop_assert!(p.next_level_xp >= p.current_level_xp);
    }

    #[test]
    fn prop_level_up_matches_level_change(previous in 0u64..1_000_000, delta in 0u64..100_000) {
        let new = previous + delta;
        let event = detect_level_up(previous, new).unwrap();
        let changed = level_for_xp(new) > level_for_xp(previous);
        prop_assert_eq!(event.is_some(), changed);
        if let Some(e) = event {
            prop_assert_eq!(e.new_level, level_for_xp(new));
            prop_assert_eq!(e.levels_gained, e.new_level - e.previous_level);
        }
    }

    #[test]
    fn prop_split_awards_fire_same_levels(
        start in 0u64..100_000,
        a in 0u64..5_000,
        b in 0u64..5_000,
    ) {
        // One award of a+b reaches the same level as a then b
        let single = detect_level_up(start, start + a + b).unwrap();
        let first = detect_level_up(start, start + a).unwrap();
        let second = detect_level_up(start + a, start + a + b).unwrap();

        let gained_split = first.map(|e| e.levels_gained).unwrap_or(0)
            + second.map(|e| e.levels_gained).unwrap_or(0);
        prop_assert_eq!(single.map(|e| e.levels_gained).unwrap_or(0), gained_split);
    }
}
