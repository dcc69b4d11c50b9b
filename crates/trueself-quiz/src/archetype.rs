//! Archetype resolution
//!
//! A score vector resolves in two lookups: the base archetype is keyed by the
//! top dimension, and the displayed name comes from the blend table keyed by
//! the ordered `(top, second)` pair.

use crate::dimension::Dimension::{
    self, ControlStructure as CS, EmotionalDepth as ED, LoveSacrifice as LS,
    RiskOrientation as RO, SocialEnergy as SE,
};
use crate::error::QuizError;
use crate::score::ScoreVector;
use serde::{Deserialize, Serialize};

/// Display-ready personality result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Archetype {
    /// Blend name (or base name when no blend exists)
    pub name: String,
    /// Emoji glyph
    pub emoji: String,
    /// One-line description
    pub description: String,
    /// Static rarity annotation for the top dimension
    pub rarity: String,
}

/// Static base archetype entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseArchetype {
    /// Base name
    pub name: &'static str,
    /// Emoji glyph
    pub emoji: &'static str,
    /// Description
    pub description: &'static str,
    /// Rarity label
    pub rarity: &'static str,
}

/// Base archetype for a top dimension
#[must_use]
pub const fn base_archetype(top: Dimension) -> BaseArchetype {
    match top {
        CS => BaseArchetype {
            name: "The Architect",
            emoji: "🏗️",
            description: "You build worlds with precision. Order is your art, and mastery is your mission.",
            rarity: "Top 8%",
        },
        ED => BaseArchetype {
            name: "The Mirror",
            emoji: "🪞",
            description: "You feel what others can't name. Your depth is your superpower — and your weight.",
            rarity: "Top 5%",
        },
        SE => BaseArchetype {
            name: "The Spark",
            emoji: "⚡",
            description: "You light up rooms and connect souls. People orbit around your warmth.",
            rarity: "Top 12%",
        },
        RO => BaseArchetype {
            name: "The Wildcard",
            emoji: "🃏",
            description: "You chase the unknown with open arms. Comfort zones bore you — chaos is your canvas.",
            rarity: "Top 3%",
        },
        LS => BaseArchetype {
            name: "The Guardian",
            emoji: "🛡️",
            description: "You carry others before yourself. Loyalty isn't a choice — it's your identity.",
            rarity: "Top 6%",
        },
    }
}

/// Blend names for every ordered pair of distinct dimensions
pub const BLENDS: [((Dimension, Dimension), &str); 20] = [
    ((CS, ED), "The Calculated Heart"),
    ((CS, SE), "The Social Strategist"),
    ((CS, RO), "The Mastermind"),
    ((CS, LS), "The Silent Pillar"),
    ((ED, CS), "The Poetic Analyst"),
    ((ED, SE), "The Empath"),
    ((ED, RO), "The Romantic Rebel"),
    ((ED, LS), "The Healer"),
    ((SE, CS), "The Charming Commander"),
    ((SE, ED), "The Soul Connector"),
    ((SE, RO), "The Life of the Party"),
    ((SE, LS), "The Selfless Host"),
    ((RO, CS), "The Calculated Daredevil"),
    ((RO, ED), "The Passionate Nomad"),
    ((RO, SE), "The Thrill Seeker"),
    ((RO, LS), "The Noble Rebel"),
    ((LS, CS), "The Quiet Hero"),
    ((LS, ED), "The Eternal Giver"),
    ((LS, SE), "The People's Champion"),
    ((LS, RO), "The Brave Protector"),
];

/// Blend name for an ordered `(top, second)` pair
#[must_use]
pub fn blend_name(top: Dimension, second: Dimension) -> Option<&'static str> {
    BLENDS
        .iter()
        .find(|((t, s), _)| *t == top && *s == second)
        .map(|(_, name)| *name)
}

/// Archetype plus the dimensions that selected it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Resolved archetype
    pub archetype: Archetype,
    /// Highest-scoring dimension
    pub top: Dimension,
    /// Second-highest dimension
    pub second: Dimension,
}

/// Resolve a score vector to its archetype
///
/// Total over every vector: ranking ties fall back to declaration order.
#[must_use]
pub fn resolve(scores: &ScoreVector) -> Resolution {
    let ranked = scores.ranked();
    let (top, second) = (ranked[0], ranked[1]);
    let base = base_archetype(top);

    let name = blend_name(top, second).unwrap_or_else(|| {
        tracing::warn!(%top, %second, "no blend for pair, using base archetype name");
        base.name
    });

    tracing::debug!(%top, %second, name, "resolved archetype");

    Resolution {
        archetype: Archetype {
            name: name.to_string(),
            emoji: base.emoji.to_string(),
            description: base.description.to_string(),
            rarity: base.rarity.to_string(),
        },
        top,
        second,
    }
}

/// Resolve an untyped score map, failing fast when it is malformed
///
/// # Errors
/// `QuizError::UnknownDimension` or `QuizError::MalformedScores` when the map
/// does not name every dimension exactly
pub fn resolve_scores<'a, I>(entries: I) -> Result<Resolution, QuizError>
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    let scores = ScoreVector::from_entries(entries)?;
    Ok(resolve(&scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blend_table_covers_every_ordered_pair() {
        for top in Dimension::ALL {
            for second in Dimension::ALL.into_iter().filter(|d| *d != top) {
                assert!(
                    blend_name(top, second).is_some(),
                    "missing blend for {top}+{second}"
                );
            }
        }
    }

    #[test]
    fn blend_table_has_no_self_pairs_or_duplicates() {
        for (i, ((t, s), _)) in BLENDS.iter().enumerate() {
            assert_ne!(t, s);
            assert!(BLENDS[i + 1..].iter().all(|(pair, _)| *pair != (*t, *s)));
        }
    }

    #[test]
    fn dominant_control_with_tied_rest_blends_with_emotional_depth() {
        let scores = ScoreVector::from_values([10, 2, 2, 2, 2]);
        let res = resolve(&scores);

        assert_eq!(res.top, CS);
        assert_eq!(res.second, ED);
        assert_eq!(res.archetype.name, "The Calculated Heart");
        assert_eq!(Some(res.archetype.name.as_str()), blend_name(CS, ED));
        assert_eq!(res.archetype.emoji, "🏗️");
        assert_eq!(res.archetype.rarity, "Top 8%");
    }

    #[test]
    fn all_equal_scores_resolve_by_declaration_order() {
        let res = resolve(&ScoreVector::from_values([4, 4, 4, 4, 4]));
        assert_eq!((res.top, res.second), (CS, ED));

        let zero = resolve(&ScoreVector::zero());
        assert_eq!(zero, res);
    }

    #[test]
    fn keeps_base_fields_for_top_dimension() {
        let res = resolve(&ScoreVector::from_values([0, 1, 2, 9, 3]));
        assert_eq!(res.archetype.name, "The Noble Rebel");
        assert_eq!(res.archetype.emoji, "🃏");
        assert_eq!(res.archetype.rarity, "Top 3%");
    }

    #[test]
    fn resolve_scores_fails_fast_on_missing_dimension() {
        let err = resolve_scores([("CS", 3), ("ED", 1)]).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn resolve_scores_accepts_legacy_keys() {
        let res = resolve_scores([
            ("Control", 1),
            ("Emotional Depth", 1),
            ("Social", 8),
            ("Risk", 1),
            ("Sacrifice", 5),
        ])
        .unwrap();
        assert_eq!(res.archetype.name, "The Selfless Host");
    }
}
