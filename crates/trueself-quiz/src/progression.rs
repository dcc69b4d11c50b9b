//! Quiz progression state machine
//!
//! A run moves `Asking(0) -> Asking(1) -> ... -> Asking(last) -> Complete`.
//! Back navigation is allowed while asking. The run stores the chosen option
//! per question and derives the score vector from those choices, so changing
//! an earlier answer replaces its contribution instead of stacking on it.

use crate::bank::{Question, QuestionBank};
use crate::error::QuizError;
use crate::score::ScoreVector;
use serde::{Deserialize, Serialize};

/// Progression state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
    /// Waiting for an answer to the question at `index`
    Asking {
        /// Zero-based question position
        index: usize,
    },
    /// All questions answered; `scores` is final
    Complete {
        /// Final score vector
        scores: ScoreVector,
    },
}

impl QuizState {
    /// Whether no further transitions are possible
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// Check a transition against the progression rules for a bank whose final
/// question sits at `last_index`.
///
/// # Errors
/// `QuizError::IllegalTransition` if the move is not permitted
pub fn validate_transition(
    from: &QuizState,
    to: &QuizState,
    last_index: usize,
) -> Result<(), QuizError> {
    if allowed(from, to, last_index) {
        Ok(())
    } else {
        Err(QuizError::IllegalTransition {
            from: from.clone(),
            to: to.clone(),
        })
    }
}

fn allowed(from: &QuizState, to: &QuizState, last_index: usize) -> bool {
    use QuizState::{Asking, Complete};
    match (from, to) {
        (Asking { index: i }, Asking { index: j }) => {
            (*i < last_index && *j == i + 1) || (*i > 0 && *j + 1 == *i)
        }
        (Asking { index: i }, Complete { .. }) => *i == last_index,
        (Complete { .. }, _) => false,
    }
}

/// One user's walk through a question bank
#[derive(Debug, Clone)]
pub struct QuizRun<'b> {
    bank: &'b QuestionBank,
    choices: Vec<Option<usize>>,
    state: QuizState,
}

impl<'b> QuizRun<'b> {
    /// Start at the first question with no answers
    #[must_use]
    pub fn new(bank: &'b QuestionBank) -> Self {
        Self {
            bank,
            choices: vec![None; bank.len()],
            state: QuizState::Asking { index: 0 },
        }
    }

    /// Answer every question in order with the given option indices
    ///
    /// # Errors
    /// Propagates the first rejected answer; fails with
    /// `QuizError::IllegalTransition` if there are more answers than questions
    pub fn replay(bank: &'b QuestionBank, answers: &[usize]) -> Result<Self, QuizError> {
        let mut run = Self::new(bank);
        for option in answers {
            run.answer(*option)?;
        }
        Ok(run)
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    /// Bank being walked
    #[inline]
    #[must_use]
    pub fn bank(&self) -> &'b QuestionBank {
        self.bank
    }

    /// Position of the question being asked
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            QuizState::Asking { index } => Some(index),
            QuizState::Complete { .. } => None,
        }
    }

    /// Question being asked
    #[must_use]
    pub fn current_question(&self) -> Option<&'b Question> {
        self.current_index().and_then(|i| self.bank.get(i))
    }

    /// Option chosen for a question, if answered
    #[inline]
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<usize> {
        self.choices.get(index).copied().flatten()
    }

    /// Number of questions with a stored answer
    #[must_use]
    pub fn answered(&self) -> usize {
        self.choices.iter().filter(|c| c.is_some()).count()
    }

    /// Whether the run has finished
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_terminal()
    }

    /// Answer the current question and advance
    ///
    /// Re-answering a question after going back replaces its earlier choice.
    ///
    /// # Errors
    /// - `QuizError::OptionOutOfRange` for a bad option index
    /// - `QuizError::IllegalTransition` once the run is complete
    pub fn answer(&mut self, option: usize) -> Result<&QuizState, QuizError> {
        let index = match self.state {
            QuizState::Asking { index } => index,
            QuizState::Complete { .. } => {
                return Err(QuizError::IllegalTransition {
                    from: self.state.clone(),
                    to: QuizState::Asking {
                        index: self.bank.len(),
                    },
                });
            }
        };

        let question = self
            .bank
            .get(index)
            .ok_or_else(|| QuizError::InvalidBank(format!("no question at {index}")))?;
        question.option(option)?;

        let previous = self.choices[index].replace(option);
        if let Some(prev) = previous.filter(|p| *p != option) {
            tracing::debug!(question = question.id, from = prev, to = option, "answer replaced");
        }

        let next = if index == self.bank.last_index() {
            QuizState::Complete {
                scores: self.scores(),
            }
        } else {
            QuizState::Asking { index: index + 1 }
        };
        self.transition(next)?;
        Ok(&self.state)
    }

    /// Step back to the previous question, keeping every stored answer
    ///
    /// # Errors
    /// - `QuizError::NoPreviousQuestion` on the first question
    /// - `QuizError::IllegalTransition` once the run is complete
    pub fn back(&mut self) -> Result<&QuizState, QuizError> {
        match self.state {
            QuizState::Asking { index: 0 } => Err(QuizError::NoPreviousQuestion),
            QuizState::Asking { index } => {
                self.transition(QuizState::Asking { index: index - 1 })?;
                Ok(&self.state)
            }
            QuizState::Complete { .. } => Err(QuizError::IllegalTransition {
                from: self.state.clone(),
                to: QuizState::Asking {
                    index: self.bank.last_index(),
                },
            }),
        }
    }

    /// Score vector from the currently stored choices
    #[must_use]
    pub fn scores(&self) -> ScoreVector {
        self.bank
            .iter()
            .zip(&self.choices)
            .filter_map(|(q, c)| c.and_then(|i| q.options.get(i)))
            .fold(ScoreVector::zero(), |acc, opt| acc.apply(&opt.scores))
    }

    /// Final vector, available once complete
    #[must_use]
    pub fn final_scores(&self) -> Option<ScoreVector> {
        match &self.state {
            QuizState::Complete { scores } => Some(*scores),
            QuizState::Asking { .. } => None,
        }
    }

    /// Percentage of questions passed, rounded
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let len = self.bank.len().max(1);
        let done = match self.state {
            QuizState::Asking { index } => index,
            QuizState::Complete { .. } => len,
        };
        u8::try_from((done * 100 + len / 2) / len).unwrap_or(100)
    }

    fn transition(&mut self, to: QuizState) -> Result<(), QuizError> {
        validate_transition(&self.state, &to, self.bank.last_index())?;
        if let QuizState::Complete { scores } = &to {
            tracing::info!(scores = ?scores.values(), "quiz complete");
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;

    #[test]
    fn forward_transitions() {
        let s0 = QuizState::Asking { index: 0 };
        let s1 = QuizState::Asking { index: 1 };
        assert!(validate_transition(&s0, &s1, 19).is_ok());
        assert!(validate_transition(&s1, &s0, 19).is_ok());
        assert!(validate_transition(&s0, &QuizState::Asking { index: 2 }, 19).is_err());
    }

    #[test]
    fn completion_only_from_last() {
        let done = QuizState::Complete {
            scores: ScoreVector::zero(),
        };
        assert!(validate_transition(&QuizState::Asking { index: 19 }, &done, 19).is_ok());
        assert!(validate_transition(&QuizState::Asking { index: 18 }, &done, 19).is_err());
        assert!(validate_transition(&done, &QuizState::Asking { index: 19 }, 19).is_err());
    }

    #[test]
    fn back_then_reanswer_replaces_contribution() {
        let bank = QuestionBank::standard();
        let mut run = QuizRun::new(&bank);

        // Q1 option 2: Control +3
        run.answer(2).unwrap();
        assert_eq!(run.scores().get(Dimension::ControlStructure), 3);

        run.back().unwrap();
        // Q1 option 0: Risk +3, Social +1
        run.answer(0).unwrap();

        let scores = run.scores();
        assert_eq!(scores.get(Dimension::ControlStructure), 0);
        assert_eq!(scores.get(Dimension::RiskOrientation), 3);
        assert_eq!(scores.get(Dimension::SocialEnergy), 1);
        assert_eq!(run.answered(), 1);
    }

    #[test]
    fn back_keeps_later_answers() {
        let bank = QuestionBank::standard();
        let mut run = QuizRun::replay(&bank, &[0, 0, 0]).unwrap();
        let before = run.scores();

        run.back().unwrap();
        run.back().unwrap();
        assert_eq!(run.current_index(), Some(1));
        assert_eq!(run.scores(), before);
        assert_eq!(run.choice(2), Some(0));
    }

    #[test]
    fn back_on_first_question_fails() {
        let bank = QuestionBank::standard();
        let mut run = QuizRun::new(&bank);
        assert_eq!(run.back().unwrap_err(), QuizError::NoPreviousQuestion);
    }

    #[test]
    fn out_of_range_option_does_not_advance() {
        let bank = QuestionBank::standard();
        let mut run = QuizRun::new(&bank);
        assert!(matches!(
            run.answer(9),
            Err(QuizError::OptionOutOfRange { question_id: 1, .. })
        ));
        assert_eq!(run.current_index(), Some(0));
        assert_eq!(run.answered(), 0);
    }

    #[test]
    fn complete_is_terminal() {
        let bank = QuestionBank::standard();
        let mut run = QuizRun::replay(&bank, &[1; 20]).unwrap();
        assert!(run.is_complete());
        assert_eq!(run.final_scores(), Some(run.scores()));
        assert!(run.answer(0).is_err());
        assert!(run.back().is_err());
        assert_eq!(run.progress_percent(), 100);
    }

    #[test]
    fn progress_rounds() {
        let bank = QuestionBank::standard();
        let mut run = QuizRun::new(&bank);
        assert_eq!(run.progress_percent(), 0);
        run.answer(0).unwrap();
        assert_eq!(run.progress_percent(), 5);
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_string(&QuizState::Asking { index: 3 }).unwrap();
        assert_eq!(json, r#"{"state":"asking","index":3}"#);
    }
}
