//! Error types for TrueSelf Core
//!
//! Provides error handling for:
//! - Narrative generation (rate limits, payment required, gateway failures)
//! - Referral tracking (unknown codes, conflicts)
//! - Payment gating
//! - Configuration loading

use trueself_quiz::QuizError;

/// Main error type
#[derive(Debug, thiserror::Error)]
pub enum TrueSelfError {
    /// Scoring precondition violated
    #[error("quiz error: {0}")]
    Quiz(#[from] QuizError),

    /// Narrative generation failed
    #[error("narrative error: {0}")]
    Narrative(#[from] NarrativeError),

    /// Referral tracking failed
    #[error("referral error: {0}")]
    Referral(#[from] ReferralError),

    /// Payment failed
    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Full results requested before unlock
    #[error("results are locked")]
    Locked,
}

impl TrueSelfError {
    /// Whether the quiz flow must stop (as opposed to degrading)
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Quiz(_) | Self::Config(_))
    }
}

/// Narrative generation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrativeError {
    /// Upstream asked us to slow down
    #[error("rate limited")]
    RateLimited,

    /// Upstream account has no credit
    #[error("payment required")]
    PaymentRequired,

    /// Upstream returned another non-success status
    #[error("gateway returned {status}: {body}")]
    Gateway {
        /// HTTP status
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// Response body was not the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Request never completed
    #[error("transport error: {0}")]
    Transport(String),

    /// API key environment variable not set
    #[error("{0} is not configured")]
    MissingApiKey(String),
}

/// Upstream error bodies are kept up to this many bytes
const MAX_GATEWAY_BODY: usize = 512;

impl NarrativeError {
    /// Map an upstream HTTP status to an error
    #[must_use]
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            429 => Self::RateLimited,
            402 => Self::PaymentRequired,
            _ => {
                let mut body = body.into();
                if body.len() > MAX_GATEWAY_BODY {
                    let end = (0..=MAX_GATEWAY_BODY)
                        .rev()
                        .find(|i| body.is_char_boundary(*i))
                        .unwrap_or(0);
                    body.truncate(end);
                }
                Self::Gateway { status, body }
            }
        }
    }

    /// HTTP status this error is reported with
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RateLimited => 429,
            Self::PaymentRequired => 402,
            _ => 500,
        }
    }

    /// Whether trying again later may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Transport(_))
    }

    /// Whether further generation in this session is pointless
    #[inline]
    #[must_use]
    pub fn is_fatal_for_session(&self) -> bool {
        matches!(self, Self::PaymentRequired | Self::MissingApiKey(_))
    }

    /// Message safe to show the user
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::RateLimited => "Rate limited, please try again later.",
            Self::PaymentRequired => "Payment required.",
            Self::Parse(_) => "Failed to parse report",
            _ => "AI generation failed",
        }
    }
}

/// Referral tracking errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferralError {
    /// Code was never registered
    #[error("referral code not found: {0}")]
    NotFound(String),

    /// Code already registered
    #[error("referral code already exists: {0}")]
    Conflict(String),

    /// Code empty after normalization
    #[error("invalid referral code: '{0}'")]
    InvalidCode(String),

    /// Action requires a visitor id
    #[error("visitor id is required")]
    MissingVisitor,

    /// Owner name missing on create
    #[error("referrer name is required")]
    MissingName,

    /// Unrecognized action name
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Remote tracker unreachable or misbehaving
    #[error("transport error: {0}")]
    Transport(String),
}

impl ReferralError {
    /// HTTP status this error is reported with
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InvalidCode(_)
            | Self::MissingVisitor
            | Self::MissingName
            | Self::InvalidAction(_) => 400,
            Self::Transport(_) => 500,
        }
    }

    /// Message safe to show the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "Referral code not found".to_string(),
            Self::Conflict(_) => "Referral code already exists".to_string(),
            Self::InvalidAction(_) => "Invalid action".to_string(),
            Self::Transport(_) => "Failed to reach referral service".to_string(),
            other => other.to_string(),
        }
    }
}

/// Payment errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// Payment declined
    #[error("payment declined: {0}")]
    Declined(String),

    /// Payment provider unreachable
    #[error("payment provider unavailable: {0}")]
    Unavailable(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are inconsistent
    #[error("invalid config value: {0}")]
    Invalid(String),
}
