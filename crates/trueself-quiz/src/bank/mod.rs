//! Question bank
//!
//! An ordered, validated list of questions. Each option carries a
//! [`ScoreDelta`]. The wire format is a JSON array of
//! `{id, text, phase?, options: [{label, scores: {dimension: n}}]}`.

mod standard;

use crate::error::QuizError;
use crate::score::{ScoreDelta, MAX_OPTION_DELTA};
use serde::{Deserialize, Serialize};

/// Known phase labels, in quiz order
pub const PHASES: [&str; 4] = [
    "The Scenarios",
    "The Inner World",
    "The Hard Choices",
    "Abstract & Synthesis",
];

/// Heading shown above a question for its phase
///
/// Known phases are numbered (`Phase 2: The Inner World`); anything else is
/// shown as-is.
#[must_use]
pub fn phase_heading(phase: &str) -> String {
    match PHASES.iter().position(|p| *p == phase) {
        Some(i) => format!("Phase {}: {}", i + 1, phase),
        None => phase.to_string(),
    }
}

/// One answer option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Text shown to the user
    pub label: String,
    /// Contribution to the score vector
    pub scores: ScoreDelta,
}

impl AnswerOption {
    /// Create option
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, scores: ScoreDelta) -> Self {
        Self {
            label: label.into(),
            scores,
        }
    }
}

/// One question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Ordinal identifier
    pub id: u32,
    /// Prompt text
    pub text: String,
    /// Optional grouping label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Options in display order
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Option by index
    ///
    /// # Errors
    /// `QuizError::OptionOutOfRange` if `index` is past the last option
    pub fn option(&self, index: usize) -> Result<&AnswerOption, QuizError> {
        self.options
            .get(index)
            .ok_or(QuizError::OptionOutOfRange {
                question_id: self.id,
                index,
                available: self.options.len(),
            })
    }

    /// Display letter for an option index (A, B, C, ...)
    #[inline]
    #[must_use]
    pub fn option_letter(index: usize) -> char {
        u8::try_from(index)
            .ok()
            .and_then(|i| b'A'.checked_add(i))
            .map_or('?', char::from)
    }

    /// Heading for this question's phase, if it has one
    #[must_use]
    pub fn phase_heading(&self) -> Option<String> {
        self.phase.as_deref().map(phase_heading)
    }
}

/// Validated, ordered question bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Validate and wrap questions
    ///
    /// # Errors
    /// `QuizError::InvalidBank` when the bank is empty, ids are not strictly
    /// increasing, a question has fewer than two options, a label is blank, or
    /// an option delta exceeds [`MAX_OPTION_DELTA`]
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::InvalidBank("bank has no questions".to_string()));
        }

        let mut prev_id: Option<u32> = None;
        for q in &questions {
            if prev_id.is_some_and(|p| q.id <= p) {
                return Err(QuizError::InvalidBank(format!(
                    "question ids must increase (saw {} after {})",
                    q.id,
                    prev_id.unwrap_or_default()
                )));
            }
            prev_id = Some(q.id);

            if q.text.trim().is_empty() {
                return Err(QuizError::InvalidBank(format!("question {} has no text", q.id)));
            }
            if q.options.len() < 2 {
                return Err(QuizError::InvalidBank(format!(
                    "question {} needs at least two options",
                    q.id
                )));
            }
            if let Some(i) = q.options.iter().position(|o| o.label.trim().is_empty()) {
                return Err(QuizError::InvalidBank(format!(
                    "question {} option {} has no label",
                    q.id, i
                )));
            }
            for (i, option) in q.options.iter().enumerate() {
                if let Some((dimension, value)) = option
                    .scores
                    .entries()
                    .find(|(_, v)| v.unsigned_abs() > MAX_OPTION_DELTA.unsigned_abs())
                {
                    return Err(QuizError::InvalidBank(format!(
                        "question {} option {} delta {value} for {} exceeds {MAX_OPTION_DELTA}",
                        q.id,
                        i,
                        dimension.code()
                    )));
                }
            }
        }

        Ok(Self { questions })
    }

    /// Parse and validate a JSON bank
    ///
    /// # Errors
    /// `QuizError::BankParse` for malformed JSON or unknown dimension keys,
    /// `QuizError::InvalidBank` for structural problems
    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    /// The built-in 20-question bank
    #[must_use]
    pub fn standard() -> Self {
        Self {
            questions: standard::questions(),
        }
    }

    /// Number of questions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a validated bank
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the final question
    #[inline]
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    /// Question by position
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// All questions in order
    #[inline]
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Iterate questions in order
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Question>> for QuestionBank {
    type Error = QuizError;

    fn try_from(value: Vec<Question>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionBank> for Vec<Question> {
    fn from(value: QuestionBank) -> Self {
        value.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;

    fn two_option_question(id: u32) -> Question {
        Question {
            id,
            text: format!("question {id}"),
            phase: None,
            options: vec![
                AnswerOption::new("yes", ScoreDelta::none().with(Dimension::RiskOrientation, 1)),
                AnswerOption::new("no", ScoreDelta::none()),
            ],
        }
    }

    #[test]
    fn standard_bank_is_valid() {
        let bank = QuestionBank::standard();
        assert_eq!(bank.len(), 20);
        assert!(QuestionBank::new(bank.questions().to_vec()).is_ok());
        assert!(bank.iter().all(|q| q.options.len() == 4));
    }

    #[test]
    fn standard_bank_has_four_phases() {
        let bank = QuestionBank::standard();
        assert_eq!(
            bank.get(0).and_then(Question::phase_heading).as_deref(),
            Some("Phase 1: The Scenarios")
        );
        assert_eq!(
            bank.get(19).and_then(Question::phase_heading).as_deref(),
            Some("Phase 4: Abstract & Synthesis")
        );
    }

    #[test]
    fn rejects_empty_bank() {
        assert!(matches!(QuestionBank::new(vec![]), Err(QuizError::InvalidBank(_))));
    }

    #[test]
    fn rejects_non_increasing_ids() {
        let err = QuestionBank::new(vec![two_option_question(2), two_option_question(2)]);
        assert!(matches!(err, Err(QuizError::InvalidBank(_))));
    }

    #[test]
    fn rejects_single_option_question() {
        let mut q = two_option_question(1);
        q.options.pop();
        assert!(matches!(QuestionBank::new(vec![q]), Err(QuizError::InvalidBank(_))));
    }

    #[test]
    fn json_round_trip_of_wire_shape() {
        let json = r#"[
            {"id": 1, "text": "Pick one", "phase": "The Scenarios", "options": [
                {"label": "Adapt instantly", "scores": {"Risk": 3, "Social": 1}},
                {"label": "Take charge", "scores": {"CS": 3}}
            ]},
            {"id": 2, "text": "Another", "options": [
                {"label": "A", "scores": {}},
                {"label": "B", "scores": {"LS": -1}}
            ]}
        ]"#;
        let bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.len(), 2);
        let opt = bank.get(0).unwrap().option(0).unwrap();
        assert_eq!(opt.scores.get(Dimension::RiskOrientation), 3);
        assert_eq!(opt.scores.get(Dimension::SocialEnergy), 1);
        assert_eq!(
            bank.get(1).unwrap().option(1).unwrap().scores.get(Dimension::LoveSacrifice),
            -1
        );
    }

    #[test]
    fn json_unknown_dimension_is_parse_error() {
        let json = r#"[{"id": 1, "text": "x", "options": [
            {"label": "a", "scores": {"Chaos": 1}},
            {"label": "b", "scores": {}}
        ]}]"#;
        assert!(matches!(QuestionBank::from_json(json), Err(QuizError::BankParse(_))));
    }

    #[test]
    fn rejects_oversized_deltas() {
        let mut q = two_option_question(1);
        q.options[1].scores = ScoreDelta::none().with(Dimension::SocialEnergy, i32::MAX);
        assert!(matches!(QuestionBank::new(vec![q]), Err(QuizError::InvalidBank(_))));

        let json = r#"[{"id": 1, "text": "x", "options": [
            {"label": "a", "scores": {"RO": 2147483647, "Risk": 1}},
            {"label": "b", "scores": {}}
        ]}]"#;
        assert!(matches!(QuestionBank::from_json(json), Err(QuizError::BankParse(_))));
    }

    #[test]
    fn option_out_of_range() {
        let q = two_option_question(7);
        assert_eq!(
            q.option(4).unwrap_err(),
            QuizError::OptionOutOfRange {
                question_id: 7,
                index: 4,
                available: 2
            }
        );
    }

    #[test]
    fn option_letters() {
        assert_eq!(Question::option_letter(0), 'A');
        assert_eq!(Question::option_letter(3), 'D');
    }

    #[test]
    fn unknown_phase_heading_passes_through() {
        assert_eq!(phase_heading("Bonus Round"), "Bonus Round");
    }
}
