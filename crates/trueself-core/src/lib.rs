//! TrueSelf Core - collaborators around the quiz
//!
//! Everything outside deterministic scoring:
//! - Configuration and the error taxonomy
//! - Narrative generation through a chat-completions gateway
//! - Referral tracking and the mock payment provider
//! - The calculating-screen reveal race
//! - The [`TrueSelf`] flow orchestrator
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trueself_core::{ChatGateway, InMemoryReferralStore, MockPayment, TrueSelf, TrueSelfConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TrueSelfConfig::default();
//! let app = TrueSelf::new(
//!     config.clone(),
//!     Arc::new(ChatGateway::from_config(&config.gateway)?),
//!     Arc::new(InMemoryReferralStore::new(config.referral.recent_visitors)),
//!     Arc::new(MockPayment::new(config.price_label.clone())),
//! );
//!
//! let run = trueself_quiz::QuizRun::replay(app.bank(), &[0; 20])?;
//! let session = app.calculate(run.scores()).await;
//! println!("{}", session.roast());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod flow;
pub mod functions_client;
pub mod narrative;
pub mod payment;
pub mod referral;
pub mod reveal;
pub mod types;

// Re-exports for convenience
pub use config::{GatewayConfig, ReferralConfig, RevealConfig, ServerConfig, TrueSelfConfig};
pub use error::{ConfigError, NarrativeError, PaymentError, ReferralError, TrueSelfError};
pub use flow::{ResultSession, TrueSelf};
pub use functions_client::{ErrorBody, FunctionsClient};
pub use narrative::{
    parse_report, section_emoji, ChatGateway, NarrativeGenerator, NarrativeRequest, Report,
    ReportSection, RoastText, REPORT_SECTIONS,
};
pub use payment::{MockPayment, PaymentProvider};
pub use referral::{
    dispatch, InMemoryReferralStore, ReferralAction, ReferralStats, ReferralTracker, TrackRequest,
    TrackResponse, VisitRecord,
};
pub use reveal::{reveal_roast, Reveal, RevealSource};
pub use types::{ReferralCode, VisitorContext, VisitorId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
