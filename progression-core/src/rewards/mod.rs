//! XP sources
//!
//! The platform events that grant XP and their base reward amounts.

use serde::{Deserialize, Serialize};

use crate::constants::{FORUM_POST_XP, FORUM_REPLY_XP, LAB_COMPLETION_XP, PROJECT_COMPLETION_XP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XpSource {
    LabCompletion,
    ProjectCompletion,
    ForumPost,
    ForumReply,
}

impl XpSource {
    pub fn base_reward(&self) -> u64 {
        match self {
            Self::LabCompletion => LAB_COMPLETION_XP,
            Self::ProjectCompletion => PROJECT_COMPLETION_XP,
            Self::ForumPost => FORUM_POST_XP,
            Self::ForumReply => FORUM_REPLY_XP,
        }
    }

    /// Stable name for logs and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LabCompletion => "lab_completion",
            Self::ProjectCompletion => "project_completion",
            Self::ForumPost => "forum_post",
            Self::ForumReply => "forum_reply",
        }
    }

    pub fn all() -> [XpSource; 4] {
        [
            Self::LabCompletion,
            Self::ProjectCompletion,
            Self::ForumPost,
            Self::ForumReply,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_rewards() {
        assert_eq!(XpSource::LabCompletion.base_reward(), 100);
        assert_eq!(XpSource::ProjectCompletion.base_reward(), 500);
        assert_eq!(XpSource::ForumPost.base_reward(), 25);
        assert_eq!(XpSource::ForumReply.base_reward(), 10);
    }

    #[test]
    fn test_every_source_grants_xp() {
        for source in XpSource::all() {
            assert!(source.base_reward() > 0, "{} grants nothing", source.as_str());
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&XpSource::LabCompletion).unwrap();
        assert_eq!(json, "\"LabCompletion\"");
        let restored: XpSource = serde_json::from_str("\"ForumReply\"").unwrap();
        assert_eq!(restored, XpSource::ForumReply);
    }
}
