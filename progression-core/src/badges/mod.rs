//! Badge System
//!
//! Static badge catalog. A badge is unlocked at most once per account; the
//! uniqueness itself is enforced by storage, this module only decides
//! *which* badges an account qualifies for:
//! - Milestone badges unlock when a level-up crosses their level
//! - Activity badges unlock from lab/project/forum counters
//! - Manual badges (e.g. "founder") are granted explicitly

use serde::{Deserialize, Serialize};

/// Badge categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeCategory {
    Learning,  // labs
    Building,  // projects
    Community, // forum
    Milestone, // level thresholds
    Special,   // manually granted
}

/// Badge rarity, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BadgeRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Presentation hints for a category or rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeStyle {
    pub label: &'static str,
    pub accent: &'static str,
}

impl BadgeCategory {
    pub fn style(&self) -> BadgeStyle {
        match self {
            Self::Learning => BadgeStyle {
                label: "Learning",
                accent: "#3B82F6",
            },
            Self::Building => BadgeStyle {
                label: "Building",
                accent: "#F97316",
            },
            Self::Community => BadgeStyle {
                label: "Community",
                accent: "#10B981",
            },
            Self::Milestone => BadgeStyle {
                label: "Milestone",
                accent: "#8B5CF6",
            },
            Self::Special => BadgeStyle {
                label: "Special",
                accent: "#EC4899",
            },
        }
    }
}

impl BadgeRarity {
    pub fn style(&self) -> BadgeStyle {
        match self {
            Self::Common => BadgeStyle {
                label: "Common",
                accent: "#9CA3AF",
            },
            Self::Uncommon => BadgeStyle {
                label: "Uncommon",
                accent: "#22C55E",
            },
            Self::Rare => BadgeStyle {
                label: "Rare",
                accent: "#3B82F6",
            },
            Self::Epic => BadgeStyle {
                label: "Epic",
                accent: "#A855F7",
            },
            Self::Legendary => BadgeStyle {
                label: "Legendary",
                accent: "#F59E0B",
            },
        }
    }
}

/// What an account has to do to earn a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockCriteria {
    /// Reach the given level
    ReachLevel(u32),
    LabsCompleted(u32),
    ProjectsCompleted(u32),
    ForumPosts(u32),
    /// Granted by an operator or a one-off event, never derived
    Manual,
}

/// Counters the caller knows about an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountActivity {
    pub level: u32,
    pub labs_completed: u32,
    pub projects_completed: u32,
    pub forum_posts: u32,
}

impl UnlockCriteria {
    pub fn is_met(&self, activity: &AccountActivity) -> bool {
        match self {
            Self::ReachLevel(level) => activity.level >= *level,
            Self::LabsCompleted(n) => activity.labs_completed >= *n,
            Self::ProjectsCompleted(n) => activity.projects_completed >= *n,
            Self::ForumPosts(n) => activity.forum_posts >= *n,
            Self::Manual => false,
        }
    }

    /// Progress toward the criterion (0.0 - 1.0)
    pub fn progress(&self, activity: &AccountActivity) -> f32 {
        let (current, target) = match self {
            Self::ReachLevel(level) => (activity.level, *level),
            Self::LabsCompleted(n) => (activity.labs_completed, *n),
            Self::ProjectsCompleted(n) => (activity.projects_completed, *n),
            Self::ForumPosts(n) => (activity.forum_posts, *n),
            Self::Manual => return 0.0,
        };
        if target == 0 {
            1.0
        } else {
            (current as f32 / target as f32).min(1.0)
        }
    }
}

/// A single catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: BadgeCategory,
    pub rarity: BadgeRarity,
    pub unlock_criteria: UnlockCriteria,
}

impl Badge {
    const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        category: BadgeCategory,
        rarity: BadgeRarity,
        unlock_criteria: UnlockCriteria,
    ) -> Self {
        Self {
            id,
            name,
            description,
            category,
            rarity,
            unlock_criteria,
        }
    }
}

use BadgeCategory::*;
use BadgeRarity::*;

static CATALOG: [Badge; 11] = [
    Badge::new(
        "founder",
        "Founder",
        "Joined the platform with the founding cohort.",
        Special,
        Legendary,
        UnlockCriteria::Manual,
    ),
    Badge::new(
        "first-lab",
        "First Steps",
        "Complete your first lab.",
        Learning,
        Common,
        UnlockCriteria::LabsCompleted(1),
    ),
    Badge::new(
        "lab-enthusiast",
        "Lab Enthusiast",
        "Complete 10 labs.",
        Learning,
        Uncommon,
        UnlockCriteria::LabsCompleted(10),
    ),
    Badge::new(
        "lab-master",
        "Lab Master",
        "Complete 50 labs.",
        Learning,
        Epic,
        UnlockCriteria::LabsCompleted(50),
    ),
    Badge::new(
        "first-project",
        "Builder",
        "Ship your first project.",
        Building,
        Common,
        UnlockCriteria::ProjectsCompleted(1),
    ),
    Badge::new(
        "project-veteran",
        "Project Veteran",
        "Ship 5 projects.",
        Building,
        Rare,
        UnlockCriteria::ProjectsCompleted(5),
    ),
    Badge::new(
        "first-post",
        "Voice of the Community",
        "Start your first forum discussion.",
        Community,
        Common,
        UnlockCriteria::ForumPosts(1),
    ),
    Badge::new(
        "forum-regular",
        "Forum Regular",
        "Start 25 forum discussions.",
        Community,
        Rare,
        UnlockCriteria::ForumPosts(25),
    ),
    Badge::new(
        "level-5",
        "Rising Mind",
        "Reach level 5.",
        Milestone,
        Uncommon,
        UnlockCriteria::ReachLevel(5),
    ),
    Badge::new(
        "level-10",
        "Digital Sage",
        "Reach level 10.",
        Milestone,
        Epic,
        UnlockCriteria::ReachLevel(10),
    ),
    Badge::new(
        "level-25",
        "Zen Master",
        "Reach level 25.",
        Milestone,
        Legendary,
        UnlockCriteria::ReachLevel(25),
    ),
];

/// All badges
pub fn badge_catalog() -> &'static [Badge] {
    &CATALOG
}

pub fn find_badge(id: &str) -> Option<&'static Badge> {
    CATALOG.iter().find(|b| b.id == id)
}

/// Level milestones in `(from_level, to_level]`
pub fn badges_for_level_range(from_level: u32, to_level: u32) -> Vec<&'static Badge> {
    CATALOG
        .iter()
        .filter(|b| match b.unlock_criteria {
            UnlockCriteria::ReachLevel(level) => level > from_level && level <= to_level,
            _ => false,
        })
        .collect()
}

/// Every non-manual badge whose criterion the activity satisfies
pub fn eligible_badges(activity: &AccountActivity) -> Vec<&'static Badge> {
    CATALOG
        .iter()
        .filter(|b| b.unlock_criteria.is_met(activity))
        .collect()
}

pub fn by_category(category: BadgeCategory) -> Vec<&'static Badge> {
    CATALOG.iter().filter(|b| b.category == category).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique() {
        let ids: HashSet<_> = badge_catalog().iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), badge_catalog().len());
    }

    #[test]
    fn test_founder_badge() {
        let founder = find_badge("founder").expect("founder exists");
        assert_eq!(founder.unlock_criteria, UnlockCriteria::Manual);
        assert_eq!(founder.rarity, BadgeRarity::Legendary);
        assert!(find_badge("nope").is_none());
    }

    #[test]
    fn test_level_range_is_half_open() {
        let ids: Vec<_> = badges_for_level_range(4, 5).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["level-5"]);
        assert!(badges_for_level_range(5, 9).is_empty());
        assert_eq!(badges_for_level_range(1, 30).len(), 3);
    }

    #[test]
    fn test_eligible_badges() {
        let activity = AccountActivity {
            level: 6,
            labs_completed: 12,
            projects_completed: 0,
            forum_posts: 1,
        };
        let ids: HashSet<_> = eligible_badges(&activity).iter().map(|b| b.id).collect();
        assert!(ids.contains("first-lab"));
        assert!(ids.contains("lab-enthusiast"));
        assert!(ids.contains("first-post"));
        assert!(ids.contains("level-5"));
        assert!(!ids.contains("lab-master"));
        assert!(!ids.contains("first-project"));
        assert!(!ids.contains("founder"), "manual badges are never derived");
    }

    #[test]
    fn test_criteria_progress() {
        let activity = AccountActivity {
            labs_completed: 5,
            ..Default::default()
        };
        let p = UnlockCriteria::LabsCompleted(10).progress(&activity);
        assert!((p - 0.5).abs() < 0.01);
        assert!((UnlockCriteria::LabsCompleted(1).progress(&activity) - 1.0).abs() < 0.01);
        assert_eq!(UnlockCriteria::Manual.progress(&activity), 0.0);
    }

    #[test]
    fn test_rarity_ordering_and_styles() {
        assert!(BadgeRarity::Common < BadgeRarity::Legendary);
        assert_eq!(BadgeRarity::Epic.style().label, "Epic");
        assert_eq!(BadgeCategory::Milestone.style().label, "Milestone");
        assert!(BadgeRarity::Rare.style().accent.starts_with('#'));
    }

    #[test]
    fn test_by_category() {
        let milestones = by_category(BadgeCategory::Milestone);
        assert_eq!(milestones.len(), 3);
        for b in &milestones {
            assert!(matches!(b.unlock_criteria, UnlockCriteria::ReachLevel(_)));
        }
    }
}
