//! Quiz flow orchestration
//!
//! [`TrueSelf`] wires the deterministic quiz to its collaborators:
//! landing (referral capture), calculating (resolution + roast race),
//! paywall (payment + referral conversion), and the full report.
//!
//! Referral bookkeeping runs detached and never blocks the flow.

use crate::config::TrueSelfConfig;
use crate::error::{NarrativeError, TrueSelfError};
use crate::narrative::{NarrativeGenerator, NarrativeRequest, Report};
use crate::payment::PaymentProvider;
use crate::referral::ReferralTracker;
use crate::reveal::{reveal_roast, Reveal, RevealSource};
use crate::types::{ReferralCode, VisitorContext};
use std::sync::Arc;
use tokio::task::JoinHandle;
use trueself_quiz::{
    resolve, PaywallGate, QuestionBank, QuizRun, Resolution, ResultView, RevealPhase, ScoreVector,
};

/// Quiz application with its collaborators
pub struct TrueSelf {
    config: TrueSelfConfig,
    bank: QuestionBank,
    narrator: Arc<dyn NarrativeGenerator>,
    referrals: Arc<dyn ReferralTracker>,
    payment: Arc<dyn PaymentProvider>,
}

impl std::fmt::Debug for TrueSelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueSelf")
            .field("config", &self.config)
            .field("questions", &self.bank.len())
            .finish_non_exhaustive()
    }
}

impl TrueSelf {
    /// Create with the standard bank
    #[must_use]
    pub fn new(
        config: TrueSelfConfig,
        narrator: Arc<dyn NarrativeGenerator>,
        referrals: Arc<dyn ReferralTracker>,
        payment: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            config,
            bank: QuestionBank::standard(),
            narrator,
            referrals,
            payment,
        }
    }

    /// With a custom question bank
    #[inline]
    #[must_use]
    pub fn with_bank(mut self, bank: QuestionBank) -> Self {
        self.bank = bank;
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TrueSelfConfig {
        &self.config
    }

    /// Question bank
    #[inline]
    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Price shown on the paywall
    #[must_use]
    pub fn price_label(&self) -> String {
        self.payment.price_label()
    }

    /// Start a new run over the bank
    #[must_use]
    pub fn begin_run(&self) -> QuizRun<'_> {
        QuizRun::new(&self.bank)
    }

    /// Handle a landing URL query: capture `ref=` and record the visit
    ///
    /// Returns the detached visit-recording task when a code was captured.
    pub fn land(&self, visitor: &mut VisitorContext, query: &str) -> Option<JoinHandle<()>> {
        let code = visitor.capture_query(query)?.clone();
        let id = visitor.visitor_id;
        let referrals = Arc::clone(&self.referrals);

        Some(tokio::spawn(async move {
            if let Err(e) = referrals.visit(&code, id).await {
                tracing::warn!(code = %code, error = %e, "failed to record referral visit");
            }
        }))
    }

    /// Register a referral code and return its share link
    ///
    /// # Errors
    /// `TrueSelfError::Referral` when the code is taken or the tracker fails
    pub async fn create_referral(
        &self,
        code: &ReferralCode,
        referrer_name: &str,
    ) -> Result<String, TrueSelfError> {
        self.referrals.create(code, referrer_name).await?;
        let link = code.share_link(&self.config.referral.site_origin);
        tracing::info!(code = %code, link = %link, "referral code created");
        Ok(link)
    }

    /// Resolve final scores and race the roast against the reveal windows
    pub async fn calculate(&self, scores: ScoreVector) -> ResultSession {
        let resolution = resolve(&scores);
        tracing::info!(
            archetype = %resolution.archetype.name,
            top = %resolution.top,
            second = %resolution.second,
            "quiz complete"
        );

        let request = NarrativeRequest::new(resolution.archetype.clone(), scores);
        let reveal = reveal_roast(Arc::clone(&self.narrator), request, &self.config.reveal).await;

        let gate = PaywallGate::new();
        let phase = RevealPhase::Calculating.advance(&gate);
        ResultSession {
            resolution,
            scores,
            reveal,
            gate,
            phase,
            conversion: None,
        }
    }

    /// Take payment and open the gate
    ///
    /// Returns `Ok(false)` if the session was already unlocked. A referral
    /// conversion is recorded detached when the visitor arrived via a code.
    ///
    /// # Errors
    /// - `TrueSelfError::Payment` if the charge failed; the gate stays locked
    pub async fn unlock(
        &self,
        session: &mut ResultSession,
        visitor: &VisitorContext,
    ) -> Result<bool, TrueSelfError> {
        if session.gate.is_unlocked() {
            return Ok(false);
        }

        let receipt = self.payment.charge(visitor.visitor_id).await?;
        session.gate.unlock(receipt);
        session.phase = session.phase.advance(&session.gate);

        if let Some(code) = visitor.referral_code.clone() {
            let id = visitor.visitor_id;
            let referrals = Arc::clone(&self.referrals);
            session.conversion = Some(tokio::spawn(async move {
                if let Err(e) = referrals.paid(&code, id).await {
                    tracing::warn!(code = %code, error = %e, "failed to record referral conversion");
                }
            }));
        }
        Ok(true)
    }

    /// Generate the full report for an unlocked session
    ///
    /// # Errors
    /// - `TrueSelfError::Locked` before unlock
    /// - `TrueSelfError::Narrative` if generation failed; show
    ///   [`NarrativeError::user_message`] and offer a retry
    pub async fn report(&self, session: &ResultSession) -> Result<Report, TrueSelfError> {
        if !session.gate.is_unlocked() {
            return Err(TrueSelfError::Locked);
        }
        let request = NarrativeRequest::new(session.resolution.archetype.clone(), session.scores);
        self.narrator.report(&request).await.map_err(|e: NarrativeError| {
            tracing::warn!(error = %e, retryable = e.is_retryable(), "report generation failed");
            e.into()
        })
    }
}

/// Results screen state for one completed run
#[derive(Debug)]
pub struct ResultSession {
    /// Resolved archetype and ranking
    pub resolution: Resolution,
    /// Final scores
    pub scores: ScoreVector,
    /// Roast race outcome
    pub reveal: Reveal,
    gate: PaywallGate,
    phase: RevealPhase,
    conversion: Option<JoinHandle<()>>,
}

impl ResultSession {
    /// Current results-screen phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Paywall gate
    #[inline]
    #[must_use]
    pub fn gate(&self) -> &PaywallGate {
        &self.gate
    }

    /// Roast text, generated or fallback
    #[inline]
    #[must_use]
    pub fn roast(&self) -> &str {
        &self.reveal.text
    }

    /// Whether the roast came from the generator
    #[inline]
    #[must_use]
    pub fn roast_generated(&self) -> bool {
        self.reveal.source == RevealSource::Generated
    }

    /// What the results screen may show now
    #[must_use]
    pub fn view(&self) -> ResultView<String> {
        self.gate.view(
            &self.resolution.archetype,
            &self.scores,
            Some(self.reveal.text.clone()),
        )
    }

    /// Wait for a roast that missed the extended window
    ///
    /// Replaces the fallback text when the late generation succeeds and
    /// returns whether it did.
    pub async fn await_late_roast(&mut self) -> bool {
        let Some(pending) = self.reveal.pending.take() else {
            return false;
        };
        match pending.await {
            Ok(Ok(text)) => {
                tracing::debug!("late roast arrived");
                self.reveal.text = text;
                self.reveal.source = RevealSource::Generated;
                true
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "late roast failed");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "late roast task aborted");
                false
            }
        }
    }

    /// Detached referral conversion task, if one was started
    pub fn take_conversion(&mut self) -> Option<JoinHandle<()>> {
        self.conversion.take()
    }
}
