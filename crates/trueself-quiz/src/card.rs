//! Result card view model

use crate::archetype::Archetype;
use crate::dimension::Dimension;
use crate::score::ScoreVector;
use serde::{Deserialize, Serialize};

/// Branding line at the foot of the card
pub const BRANDING: &str = "trueself.app 🎭";

/// One dimension bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBar {
    /// Dimension shown
    pub dimension: Dimension,
    /// Display label
    pub label: String,
    /// Raw total
    pub score: i32,
    /// Width relative to the highest score, 0–100
    pub width_percent: u8,
}

/// Unlocked result card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCard {
    /// Resolved archetype
    pub archetype: Archetype,
    /// Rarity badge text
    pub rarity_badge: String,
    /// One bar per dimension, declaration order
    pub bars: Vec<ScoreBar>,
    /// Footer line
    pub branding: String,
}

impl ResultCard {
    /// Build the card for a resolved archetype and its scores
    #[must_use]
    pub fn new(archetype: &Archetype, scores: &ScoreVector) -> Self {
        let scale = i64::from(scores.max_score().max(1));
        let bars = scores
            .iter()
            .map(|(dimension, score)| {
                let pct = (i64::from(score.max(0)) * 100 + scale / 2) / scale;
                ScoreBar {
                    dimension,
                    label: dimension.label().to_string(),
                    score,
                    width_percent: u8::try_from(pct.clamp(0, 100)).unwrap_or(100),
                }
            })
            .collect();

        Self {
            archetype: archetype.clone(),
            rarity_badge: format!("✨ You are rare: {}", archetype.rarity),
            bars,
            branding: BRANDING.to_string(),
        }
    }

    /// Title used for native sharing
    #[must_use]
    pub fn share_title(&self) -> String {
        format!("I'm \"{}\" — TrueSelf", self.archetype.name)
    }

    /// Body used for native sharing
    #[must_use]
    pub fn share_text(&self) -> String {
        format!(
            "My TrueSelf archetype is \"{}\" ({}). Take the quiz!",
            self.archetype.name, self.archetype.rarity
        )
    }
}
