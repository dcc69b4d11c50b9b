//! Personality dimensions scored by the quiz
//!
//! The set is fixed at build time. Declaration order matters: it is the
//! iteration order for score vectors and the tie-break order when ranking.

use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of dimensions
pub const DIMENSION_COUNT: usize = 5;

/// One trait axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Dimension {
    /// Control & Structure (CS)
    ControlStructure,
    /// Emotional Depth (ED)
    EmotionalDepth,
    /// Social Energy (SE)
    SocialEnergy,
    /// Risk Orientation (RO)
    RiskOrientation,
    /// Love & Sacrifice (LS)
    LoveSacrifice,
}

impl Dimension {
    /// All dimensions in declaration order
    pub const ALL: [Dimension; DIMENSION_COUNT] = [
        Dimension::ControlStructure,
        Dimension::EmotionalDepth,
        Dimension::SocialEnergy,
        Dimension::RiskOrientation,
        Dimension::LoveSacrifice,
    ];

    /// Position in declaration order
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Dimension::ControlStructure => 0,
            Dimension::EmotionalDepth => 1,
            Dimension::SocialEnergy => 2,
            Dimension::RiskOrientation => 3,
            Dimension::LoveSacrifice => 4,
        }
    }

    /// Stable two-letter code
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Dimension::ControlStructure => "CS",
            Dimension::EmotionalDepth => "ED",
            Dimension::SocialEnergy => "SE",
            Dimension::RiskOrientation => "RO",
            Dimension::LoveSacrifice => "LS",
        }
    }

    /// Display label
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Dimension::ControlStructure => "Control & Structure",
            Dimension::EmotionalDepth => "Emotional Depth",
            Dimension::SocialEnergy => "Social Energy",
            Dimension::RiskOrientation => "Risk Orientation",
            Dimension::LoveSacrifice => "Love & Sacrifice",
        }
    }

    /// Short name used by older question banks
    #[inline]
    #[must_use]
    pub const fn legacy_name(self) -> &'static str {
        match self {
            Dimension::ControlStructure => "Control",
            Dimension::EmotionalDepth => "Emotional Depth",
            Dimension::SocialEnergy => "Social",
            Dimension::RiskOrientation => "Risk",
            Dimension::LoveSacrifice => "Sacrifice",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Dimension {
    type Err = QuizError;

    /// Accepts the code, the label, or the legacy name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Dimension::ALL
            .into_iter()
            .find(|d| key == d.code() || key == d.label() || key == d.legacy_name())
            .ok_or_else(|| QuizError::UnknownDimension(key.to_string()))
    }
}

impl TryFrom<String> for Dimension {
    type Error = QuizError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dimension> for &'static str {
    fn from(value: Dimension) -> Self {
        value.code()
    }
}
