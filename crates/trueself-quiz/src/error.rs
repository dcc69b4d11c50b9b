//! Error types for TrueSelf quiz scoring
//!
//! Everything here is a precondition violation: a malformed bank, a score map
//! missing a dimension, or an illegal progression step. None of these are
//! recoverable by retrying.

use crate::dimension::Dimension;
use crate::progression::QuizState;

/// Main quiz error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    /// Score key does not name a known dimension
    #[error("unknown dimension: '{0}'")]
    UnknownDimension(String),

    /// Score map is missing one or more dimensions
    #[error("malformed score vector: missing {missing:?}")]
    MalformedScores {
        /// Dimensions with no entry
        missing: Vec<Dimension>,
    },

    /// Score map names the same dimension more than once
    #[error("dimension {0:?} given more than once")]
    DuplicateDimension(Dimension),

    /// Question bank failed validation
    #[error("invalid question bank: {0}")]
    InvalidBank(String),

    /// Question bank JSON could not be decoded
    #[error("question bank parse error: {0}")]
    BankParse(String),

    /// Option index outside the question's options
    #[error("question {question_id} has no option {index} ({available} available)")]
    OptionOutOfRange {
        /// Question the answer was given for
        question_id: u32,
        /// Requested option index
        index: usize,
        /// Number of options on the question
        available: usize,
    },

    /// Back navigation requested on the first question
    #[error("already at the first question")]
    NoPreviousQuestion,

    /// Transition not permitted from the current state
    #[error("illegal transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// State the run was in
        from: QuizState,
        /// State that was requested
        to: QuizState,
    },
}

impl QuizError {
    /// Whether this error stems from static configuration (bank or score shape)
    /// rather than from a user step
    #[inline]
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDimension(_)
                | Self::MalformedScores { .. }
                | Self::DuplicateDimension(_)
                | Self::InvalidBank(_)
                | Self::BankParse(_)
        )
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        Self::BankParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_scores_display_lists_missing() {
        let err = QuizError::MalformedScores {
            missing: vec![Dimension::RiskOrientation],
        };
        assert!(err.to_string().contains("RiskOrientation"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn duplicate_dimension_is_configuration() {
        let err = QuizError::DuplicateDimension(Dimension::ControlStructure);
        assert!(err.to_string().contains("ControlStructure"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn transition_error_is_not_configuration() {
        let err = QuizError::IllegalTransition {
            from: QuizState::Asking { index: 0 },
            to: QuizState::Asking { index: 5 },
        };
        assert!(!err.is_configuration_error());
    }
}
