//! Level titles and messages.
//!
//! Levels 1-10 are hand-authored. Anything above falls back to a generated
//! "Zen Level N" entry. Consumers may match on these strings, so they are
//! fixed data.

use serde::{Deserialize, Serialize};

use super::threshold;
use crate::constants::{AUTHORED_LEVELS, MIN_LEVEL};
use crate::error::{ProgressionError, ProgressionResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMetadata {
    pub level: u32,
    pub xp_required: u64,
    pub title: String,
    pub message: String,
}

/// (title, message) for levels 1..=10, index = level - 1
const AUTHORED: [(&str, &str); AUTHORED_LEVELS as usize] = [
    (
        "Digital Awakening",
        "Your journey begins. Every expert was once a beginner.",
    ),
    (
        "Curious Explorer",
        "You are finding your way around. Keep asking questions.",
    ),
    (
        "Code Apprentice",
        "The basics are clicking into place. Practice makes it stick.",
    ),
    (
        "Pattern Seeker",
        "You are starting to see the shapes behind the code.",
    ),
    (
        "Focused Builder",
        "Labs are turning into projects. You build with intent now.",
    ),
    (
        "Systems Thinker",
        "You see how the pieces connect. Zoom out, then dive in.",
    ),
    (
        "Flow Practitioner",
        "Hours disappear when you work. That is the flow state.",
    ),
    (
        "Craft Artisan",
        "Your work has a signature. Others learn from your code.",
    ),
    (
        "Mindful Architect",
        "You design before you type. Calm decisions, solid systems.",
    ),
    (
        "Digital Sage",
        "You have walked the whole path. Now help others walk it.",
    ),
];

const FALLBACK_MESSAGE: &str = "You have gone beyond the map. Keep learning, keep building.";

/// Metadata for `level`. Levels above the authored table get generated text.
pub fn level_metadata(level: u32) -> ProgressionResult<LevelMetadata> {
    if level < MIN_LEVEL {
        return Err(ProgressionError::InvalidLevel { level });
    }

    let (title, message) = match AUTHORED.get((level - 1) as usize) {
        Some((title, message)) => (title.to_string(), message.to_string()),
        None => (format!("Zen Level {}", level), FALLBACK_MESSAGE.to_string()),
    };

    Ok(LevelMetadata {
        level,
        xp_required: threshold(level),
        title,
        message,
    })
}

/// Definitions for levels `1..=up_to`, e.g. for a level ladder in the UI.
pub fn level_table(up_to: u32) -> Vec<LevelMetadata> {
    (MIN_LEVEL..=up_to)
        .filter_map(|level| level_metadata(level).ok())
        .collect()
}
