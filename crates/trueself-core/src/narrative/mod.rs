//! AI narrative capability
//!
//! Two generations are offered for a resolved archetype:
//! - a short "roast & cheer" paragraph shown on the result card
//! - a fifteen-section personality report
//!
//! The text service is opaque; [`ChatGateway`] talks to an
//! OpenAI-compatible chat-completions endpoint and
//! [`crate::functions_client::FunctionsClient`] talks to the HTTP functions.

pub mod gateway;
pub mod prompt;

pub use gateway::ChatGateway;

use crate::error::NarrativeError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use trueself_quiz::{Archetype, ScoreVector};

/// Report section titles, in order
pub const REPORT_SECTIONS: [&str; 15] = [
    "Executive Summary",
    "Your Archetype Profile",
    "Control & Structure Deep Dive",
    "Emotional Depth Deep Dive",
    "Social Energy Deep Dive",
    "Risk Orientation Deep Dive",
    "Love & Sacrifice Deep Dive",
    "Your Strongest Dimension",
    "Your Growth Edge",
    "Relationship Style",
    "Career & Work Style",
    "Stress Response Pattern",
    "Hidden Superpower",
    "Your Shadow Side",
    "Personal Growth Roadmap",
];

const SECTION_EMOJIS: [&str; 15] = [
    "🎭", "🧬", "📊", "⚡", "🌑", "🔥", "💞", "💍", "🚀", "🔋", "🧠", "🏠", "💎", "🤝", "🏆",
];

/// Emoji shown beside a report section
#[must_use]
pub fn section_emoji(title: &str) -> &'static str {
    REPORT_SECTIONS
        .iter()
        .position(|t| *t == title)
        .map_or("📌", |i| SECTION_EMOJIS[i])
}

/// Input to either generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    /// Resolved archetype
    pub archetype: Archetype,
    /// Final scores
    pub scores: ScoreVector,
}

impl NarrativeRequest {
    /// Create request
    #[inline]
    #[must_use]
    pub fn new(archetype: Archetype, scores: ScoreVector) -> Self {
        Self { archetype, scores }
    }
}

/// One report section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section title
    pub title: String,
    /// Two to four sentences
    pub content: String,
}

impl ReportSection {
    /// Emoji for this section's title
    #[inline]
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        section_emoji(&self.title)
    }
}

/// Full report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Report {
    /// Sections in presentation order
    pub sections: Vec<ReportSection>,
}

/// Roast response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoastText {
    /// Generated paragraph
    pub text: String,
}

/// Text-generation capability for narratives
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Short roast & cheer paragraph
    async fn roast(&self, request: &NarrativeRequest) -> Result<String, NarrativeError>;

    /// Fifteen-section report
    async fn report(&self, request: &NarrativeRequest) -> Result<Report, NarrativeError>;
}

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*").expect("code fence pattern is valid"));

/// Parse model output into a report
///
/// Markdown code fences are stripped first. A section count other than
/// fifteen is accepted with a warning.
pub fn parse_report(text: &str) -> Result<Report, NarrativeError> {
    let cleaned = CODE_FENCE.replace_all(text, "");
    let report: Report = serde_json::from_str(cleaned.trim()).map_err(|e| {
        tracing::error!(error = %e, raw = %text, "failed to parse report");
        NarrativeError::Parse(e.to_string())
    })?;

    if report.sections.len() != REPORT_SECTIONS.len() {
        tracing::warn!(
            sections = report.sections.len(),
            expected = REPORT_SECTIONS.len(),
            "report section count mismatch"
        );
    }
    Ok(report)
}
