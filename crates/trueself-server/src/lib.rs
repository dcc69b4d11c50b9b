//! TrueSelf Server - HTTP functions
//!
//! Endpoints:
//! - `POST /functions/generate-result` roast & cheer paragraph
//! - `POST /functions/generate-report` fifteen-section report
//! - `POST /functions/track-referral` visit / paid / create / stats
//! - `GET  /api/questions` the question bank
//! - `POST /api/resolve` archetype for a score map
//!
//! Errors are returned as `{"error": "..."}` with the collaborator's status.

#![warn(unreachable_pub)]

mod handlers;
pub mod telemetry;

use async_trait::async_trait;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use trueself_core::{
    ChatGateway, InMemoryReferralStore, NarrativeError, NarrativeGenerator, NarrativeRequest,
    ReferralTracker, Report, TrueSelfConfig,
};
use trueself_quiz::QuestionBank;
use warp::{Filter, Reply};

pub use handlers::{ResolveRequest, ResolveResponse};

/// Maximum accepted request body
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Narrative generator
    pub narrator: Arc<dyn NarrativeGenerator>,
    /// Referral tracker
    pub referrals: Arc<dyn ReferralTracker>,
    /// Question bank served by `/api/questions`
    pub bank: Arc<QuestionBank>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("questions", &self.bank.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State over the standard bank
    #[must_use]
    pub fn new(
        narrator: Arc<dyn NarrativeGenerator>,
        referrals: Arc<dyn ReferralTracker>,
    ) -> Self {
        Self {
            narrator,
            referrals,
            bank: Arc::new(QuestionBank::standard()),
        }
    }

    /// With a custom question bank
    #[inline]
    #[must_use]
    pub fn with_bank(mut self, bank: QuestionBank) -> Self {
        self.bank = Arc::new(bank);
        self
    }

    /// Production state: chat gateway plus in-memory referral store
    ///
    /// A missing API key is logged; narrative endpoints then answer 500.
    #[must_use]
    pub fn from_config(config: &TrueSelfConfig) -> Self {
        let narrator: Arc<dyn NarrativeGenerator> = match ChatGateway::from_config(&config.gateway)
        {
            Ok(gateway) => Arc::new(gateway),
            Err(e) => {
                tracing::warn!(error = %e, "narrative generation disabled");
                Arc::new(Unconfigured(e))
            }
        };
        let referrals = Arc::new(InMemoryReferralStore::new(config.referral.recent_visitors));
        Self::new(narrator, referrals)
    }
}

/// Narrator standing in when the gateway could not be built
#[derive(Debug)]
struct Unconfigured(NarrativeError);

#[async_trait]
impl NarrativeGenerator for Unconfigured {
    async fn roast(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Err(self.0.clone())
    }

    async fn report(&self, _request: &NarrativeRequest) -> Result<Report, NarrativeError> {
        Err(self.0.clone())
    }
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["authorization", "x-client-info", "apikey", "content-type"])
}

/// All routes with CORS and JSON error recovery
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let json_body = warp::body::content_length_limit(MAX_BODY_BYTES);

    let generate_result = warp::path!("functions" / "generate-result")
        .and(warp::post())
        .and(json_body)
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::generate_result);

    let generate_report = warp::path!("functions" / "generate-report")
        .and(warp::post())
        .and(json_body)
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::generate_report);

    let track_referral = warp::path!("functions" / "track-referral")
        .and(warp::post())
        .and(json_body)
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::track_referral);

    let questions = warp::path!("api" / "questions")
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(|state: AppState| warp::reply::json(&*state.bank));

    let resolve = warp::path!("api" / "resolve")
        .and(warp::post())
        .and(json_body)
        .and(warp::body::json())
        .and_then(handlers::resolve);

    generate_result
        .or(generate_report)
        .or(track_referral)
        .or(questions)
        .or(resolve)
        .with(cors())
        .recover(handlers::handle_rejection)
        .with(warp::trace::request())
}

/// Serve until Ctrl-C
///
/// # Errors
/// Returns an error if the address cannot be bound.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let (bound, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })?;
    tracing::info!(addr = %bound, "trueself server listening");
    server.await;
    Ok(())
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
