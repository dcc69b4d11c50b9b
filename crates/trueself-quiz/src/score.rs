//! Score accumulation
//!
//! [`ScoreVector`] holds a total for every dimension; [`ScoreDelta`] is the
//! partial contribution carried by one answer option. Both are fixed-shape
//! arrays indexed by [`Dimension::index`], so a dimension can never be missing
//! once a value has been constructed.

use crate::dimension::{Dimension, DIMENSION_COUNT};
use crate::error::QuizError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::ops::{Add, Sub};

/// Largest magnitude a single option may add to one dimension
pub const MAX_OPTION_DELTA: i32 = 1000;

/// Per-dimension integer totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, i32>", into = "IndexMap<String, i32>")]
pub struct ScoreVector([i32; DIMENSION_COUNT]);

impl ScoreVector {
    /// All-zero vector
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0; DIMENSION_COUNT])
    }

    /// Build from values in declaration order (CS, ED, SE, RO, LS)
    #[inline]
    #[must_use]
    pub const fn from_values(values: [i32; DIMENSION_COUNT]) -> Self {
        Self(values)
    }

    /// Set one dimension
    #[inline]
    #[must_use]
    pub fn with(mut self, dimension: Dimension, value: i32) -> Self {
        self.0[dimension.index()] = value;
        self
    }

    /// Build from an untyped map, failing if any dimension is absent
    ///
    /// # Errors
    /// - `QuizError::UnknownDimension` for a key that names no dimension
    /// - `QuizError::DuplicateDimension` when two keys name the same dimension
    /// - `QuizError::MalformedScores` when one or more dimensions are missing
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, QuizError>
    where
        I: IntoIterator<Item = (&'a str, i32)>,
    {
        let mut values: [Option<i32>; DIMENSION_COUNT] = [None; DIMENSION_COUNT];
        for (key, value) in entries {
            let dimension: Dimension = key.parse()?;
            let slot = &mut values[dimension.index()];
            if slot.is_some() {
                return Err(QuizError::DuplicateDimension(dimension));
            }
            *slot = Some(value);
        }

        let missing: Vec<Dimension> = Dimension::ALL
            .into_iter()
            .filter(|d| values[d.index()].is_none())
            .collect();
        if !missing.is_empty() {
            return Err(QuizError::MalformedScores { missing });
        }

        Ok(Self(values.map(|v| v.unwrap_or_default())))
    }

    /// Sum of a sequence of deltas
    #[must_use]
    pub fn sum<'a, I>(deltas: I) -> Self
    where
        I: IntoIterator<Item = &'a ScoreDelta>,
    {
        deltas.into_iter().fold(Self::zero(), |acc, d| acc.apply(d))
    }

    /// Add one option's delta; dimensions the delta leaves at zero are unchanged
    ///
    /// Totals saturate at the `i32` bounds.
    #[inline]
    #[must_use]
    pub fn apply(self, delta: &ScoreDelta) -> Self {
        let mut out = self.0;
        for (slot, change) in out.iter_mut().zip(delta.0) {
            *slot = slot.saturating_add(change);
        }
        Self(out)
    }

    /// Remove one option's delta
    #[inline]
    #[must_use]
    pub fn retract(self, delta: &ScoreDelta) -> Self {
        let mut out = self.0;
        for (slot, change) in out.iter_mut().zip(delta.0) {
            *slot = slot.saturating_sub(change);
        }
        Self(out)
    }

    /// Total for one dimension
    #[inline]
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> i32 {
        self.0[dimension.index()]
    }

    /// `(dimension, total)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, i32)> + '_ {
        Dimension::ALL.into_iter().map(|d| (d, self.get(d)))
    }

    /// Highest single total
    #[inline]
    #[must_use]
    pub fn max_score(&self) -> i32 {
        self.0.iter().copied().max().unwrap_or_default()
    }

    /// Sum across all dimensions
    #[inline]
    #[must_use]
    pub fn total(&self) -> i32 {
        self.0.iter().fold(0_i32, |acc, v| acc.saturating_add(*v))
    }

    /// Dimensions ordered by score descending
    ///
    /// The sort is stable over declaration order, so equal scores keep
    /// CS, ED, SE, RO, LS precedence.
    #[must_use]
    pub fn ranked(&self) -> [Dimension; DIMENSION_COUNT] {
        let mut dims = Dimension::ALL;
        dims.sort_by_key(|d| Reverse(self.get(*d)));
        dims
    }

    /// Raw values in declaration order
    #[inline]
    #[must_use]
    pub const fn values(&self) -> [i32; DIMENSION_COUNT] {
        self.0
    }
}

impl Add<&ScoreDelta> for ScoreVector {
    type Output = ScoreVector;

    fn add(self, rhs: &ScoreDelta) -> Self::Output {
        self.apply(rhs)
    }
}

impl Sub<&ScoreDelta> for ScoreVector {
    type Output = ScoreVector;

    fn sub(self, rhs: &ScoreDelta) -> Self::Output {
        self.retract(rhs)
    }
}

impl TryFrom<IndexMap<String, i32>> for ScoreVector {
    type Error = QuizError;

    fn try_from(map: IndexMap<String, i32>) -> Result<Self, Self::Error> {
        Self::from_entries(map.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

impl From<ScoreVector> for IndexMap<String, i32> {
    fn from(value: ScoreVector) -> Self {
        value.iter().map(|(d, v)| (d.code().to_string(), v)).collect()
    }
}

/// Partial score contribution of one answer option
///
/// Omitted dimensions are zero. Deltas may be negative but never exceed
/// [`MAX_OPTION_DELTA`] in magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, i32>", into = "IndexMap<String, i32>")]
pub struct ScoreDelta([i32; DIMENSION_COUNT]);

impl ScoreDelta {
    /// Empty delta
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self([0; DIMENSION_COUNT])
    }

    /// Set one dimension's delta
    #[inline]
    #[must_use]
    pub fn with(mut self, dimension: Dimension, value: i32) -> Self {
        self.0[dimension.index()] = value;
        self
    }

    /// Delta for one dimension
    #[inline]
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> i32 {
        self.0[dimension.index()]
    }

    /// Whether every entry is zero
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|v| *v == 0)
    }

    /// Non-zero entries in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (Dimension, i32)> + '_ {
        Dimension::ALL
            .into_iter()
            .map(|d| (d, self.get(d)))
            .filter(|(_, v)| *v != 0)
    }
}

impl TryFrom<IndexMap<String, i32>> for ScoreDelta {
    type Error = QuizError;

    fn try_from(map: IndexMap<String, i32>) -> Result<Self, Self::Error> {
        let mut delta = Self::none();
        let mut seen = [false; DIMENSION_COUNT];
        for (key, value) in &map {
            let dimension: Dimension = key.parse()?;
            if std::mem::replace(&mut seen[dimension.index()], true) {
                return Err(QuizError::DuplicateDimension(dimension));
            }
            if value.unsigned_abs() > MAX_OPTION_DELTA.unsigned_abs() {
                return Err(QuizError::InvalidBank(format!(
                    "delta {value} for {} exceeds {MAX_OPTION_DELTA}",
                    dimension.code()
                )));
            }
            delta.0[dimension.index()] = *value;
        }
        Ok(delta)
    }
}

impl From<ScoreDelta> for IndexMap<String, i32> {
    fn from(value: ScoreDelta) -> Self {
        value
            .entries()
            .map(|(d, v)| (d.code().to_string(), v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn apply_leaves_untouched_dimensions() {
        let v = ScoreVector::zero().with(Dimension::SocialEnergy, 4);
        let delta = ScoreDelta::none().with(Dimension::RiskOrientation, 3);
        let out = v.apply(&delta);

        assert_eq!(out.values(), [0, 0, 4, 3, 0]);
    }

    #[test]
    fn negative_deltas_subtract() {
        let delta = ScoreDelta::none()
            .with(Dimension::ControlStructure, -2)
            .with(Dimension::LoveSacrifice, 1);
        let out = ScoreVector::zero() + &delta;

        assert_eq!(out.get(Dimension::ControlStructure), -2);
        assert_eq!(out.get(Dimension::LoveSacrifice), 1);
        assert_eq!(out - &delta, ScoreVector::zero());
    }

    #[test]
    fn ranked_breaks_ties_by_declaration_order() {
        let v = ScoreVector::from_values([1, 5, 5, 0, 5]);
        assert_eq!(
            v.ranked(),
            [
                Dimension::EmotionalDepth,
                Dimension::SocialEnergy,
                Dimension::LoveSacrifice,
                Dimension::ControlStructure,
                Dimension::RiskOrientation,
            ]
        );
    }

    #[test]
    fn vector_json_keyed_by_code_in_order() {
        let v = ScoreVector::from_values([1, 2, 3, 4, 5]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"CS":1,"ED":2,"SE":3,"RO":4,"LS":5}"#);
    }

    #[test]
    fn vector_json_missing_dimension_fails() {
        let err = serde_json::from_str::<ScoreVector>(r#"{"CS":1,"ED":2,"SE":3,"RO":4}"#)
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn from_entries_accepts_legacy_names() {
        let v = ScoreVector::from_entries([
            ("Control", 3),
            ("Emotional Depth", 1),
            ("Social", 0),
            ("Risk", 2),
            ("Sacrifice", 9),
        ])
        .unwrap();
        assert_eq!(v.values(), [3, 1, 0, 2, 9]);
    }

    #[test]
    fn from_entries_reports_every_missing_dimension() {
        let err = ScoreVector::from_entries([("CS", 1), ("SE", 1), ("LS", 1)]).unwrap_err();
        assert_eq!(
            err,
            QuizError::MalformedScores {
                missing: vec![Dimension::EmotionalDepth, Dimension::RiskOrientation],
            }
        );
    }

    #[test]
    fn delta_json_skips_zeros() {
        let delta: ScoreDelta = serde_json::from_str(r#"{"Risk":3,"Social":1,"CS":0}"#).unwrap();
        assert_eq!(delta.get(Dimension::RiskOrientation), 3);
        assert_eq!(serde_json::to_string(&delta).unwrap(), r#"{"SE":1,"RO":3}"#);
    }

    #[test]
    fn sum_of_deltas() {
        let a = ScoreDelta::none().with(Dimension::ControlStructure, 3);
        let b = ScoreDelta::none()
            .with(Dimension::ControlStructure, 2)
            .with(Dimension::EmotionalDepth, 1);
        let total = ScoreVector::sum([&a, &b]);
        assert_eq!(total.values(), [5, 1, 0, 0, 0]);
        assert_eq!(total.total(), 6);
        assert_eq!(total.max_score(), 5);
    }

    #[test]
    fn from_entries_rejects_aliased_duplicates() {
        let entries = [("CS", 10), ("Control", 0), ("ED", 2), ("SE", 5), ("RO", 2), ("LS", 2)];
        assert_eq!(
            ScoreVector::from_entries(entries),
            Err(QuizError::DuplicateDimension(Dimension::ControlStructure))
        );

        let mut reversed = entries;
        reversed.swap(0, 1);
        assert_eq!(
            ScoreVector::from_entries(reversed),
            Err(QuizError::DuplicateDimension(Dimension::ControlStructure))
        );
    }

    #[test]
    fn delta_json_rejects_aliased_duplicates() {
        let err = serde_json::from_str::<ScoreDelta>(r#"{"RO":2,"Risk":1}"#).unwrap_err();
        assert!(err.to_string().contains("RiskOrientation"));
    }

    #[test]
    fn delta_json_rejects_oversized_values() {
        let err = serde_json::from_str::<ScoreDelta>(r#"{"RO":2147483647}"#).unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let edge: ScoreDelta = serde_json::from_str(r#"{"LS":-1000}"#).unwrap();
        assert_eq!(edge.get(Dimension::LoveSacrifice), -MAX_OPTION_DELTA);
    }

    #[test]
    fn totals_saturate_instead_of_wrapping() {
        let v = ScoreVector::from_values([i32::MAX, i32::MIN, 0, 0, 0]);
        let delta = ScoreDelta::none()
            .with(Dimension::ControlStructure, 5)
            .with(Dimension::EmotionalDepth, 5);

        assert_eq!(v.apply(&delta).get(Dimension::ControlStructure), i32::MAX);
        assert_eq!(v.retract(&delta).get(Dimension::EmotionalDepth), i32::MIN);
        assert_eq!(ScoreVector::from_values([i32::MAX, 1, 0, 0, 0]).total(), i32::MAX);
    }
}
