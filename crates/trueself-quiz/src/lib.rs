//! TrueSelf Quiz - scoring and archetype resolution
//!
//! The deterministic core of the quiz:
//! - Five fixed personality dimensions
//! - A validated question bank whose options carry score deltas
//! - Score accumulation into a fixed-shape vector
//! - Two-key archetype lookup (top dimension, blend with second)
//! - The progression state machine and the paywall gate
//!
//! # Example
//!
//! ```rust
//! use trueself_quiz::{resolve, QuestionBank, QuizRun};
//!
//! let bank = QuestionBank::standard();
//! let run = QuizRun::replay(&bank, &[0; 20]).unwrap();
//! let scores = run.final_scores().unwrap();
//!
//! assert_eq!(resolve(&scores).archetype.name, "The Mastermind");
//! ```

#![warn(unreachable_pub)]

pub mod archetype;
pub mod bank;
pub mod card;
pub mod dimension;
pub mod error;
pub mod paywall;
pub mod progression;
pub mod score;

// Re-exports for convenience
pub use archetype::{blend_name, resolve, resolve_scores, Archetype, Resolution, BLENDS};
pub use bank::{phase_heading, AnswerOption, Question, QuestionBank};
pub use card::{ResultCard, ScoreBar};
pub use dimension::{Dimension, DIMENSION_COUNT};
pub use error::QuizError;
pub use paywall::{FullResult, Gate, PaywallGate, ResultView, RevealPhase, Teaser, UnlockReceipt};
pub use progression::{validate_transition, QuizRun, QuizState};
pub use score::{ScoreDelta, ScoreVector, MAX_OPTION_DELTA};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
