//! Testing utilities for TrueSelf workspace
//!
//! Shared fakes, fixtures, and scripted answers.

#![allow(missing_docs)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use trueself_core::{
    InMemoryReferralStore, MockPayment, NarrativeError, NarrativeGenerator, NarrativeRequest,
    Report, ReportSection, TrueSelf, TrueSelfConfig, REPORT_SECTIONS,
};
use trueself_quiz::{resolve, QuestionBank, QuizRun, ScoreVector};

/// Narrator returning canned results after an optional delay
#[derive(Debug)]
pub struct ScriptedNarrator {
    roast: Result<String, NarrativeError>,
    report: Result<Report, NarrativeError>,
    delay: Duration,
    roast_calls: AtomicUsize,
    report_calls: AtomicUsize,
}

impl ScriptedNarrator {
    pub fn new(roast: impl Into<String>) -> Self {
        Self {
            roast: Ok(roast.into()),
            report: Ok(full_report()),
            delay: Duration::ZERO,
            roast_calls: AtomicUsize::new(0),
            report_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: NarrativeError) -> Self {
        Self {
            roast: Err(err.clone()),
            report: Err(err),
            ..Self::new("")
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_report(mut self, report: Result<Report, NarrativeError>) -> Self {
        self.report = report;
        self
    }

    pub fn roast_calls(&self) -> usize {
        self.roast_calls.load(Ordering::SeqCst)
    }

    pub fn report_calls(&self) -> usize {
        self.report_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrativeGenerator for ScriptedNarrator {
    async fn roast(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        self.roast_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.roast.clone()
    }

    async fn report(&self, _request: &NarrativeRequest) -> Result<Report, NarrativeError> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.report.clone()
    }
}

/// Report with every section title filled in
pub fn full_report() -> Report {
    Report {
        sections: REPORT_SECTIONS
            .iter()
            .map(|title| ReportSection {
                title: (*title).to_string(),
                content: format!("About your {}.", title.to_lowercase()),
            })
            .collect(),
    }
}

/// Same option index for every question in the bank
pub fn same_answers(bank: &QuestionBank, option: usize) -> Vec<usize> {
    vec![option; bank.len()]
}

/// Final scores for a scripted run over the standard bank
pub fn scripted_scores(answers: &[usize]) -> ScoreVector {
    let bank = QuestionBank::standard();
    QuizRun::replay(&bank, answers)
        .unwrap()
        .final_scores()
        .expect("scripted answers should complete the run")
}

pub fn sample_request() -> NarrativeRequest {
    let scores = ScoreVector::from_values([33, 10, 6, 12, 6]);
    NarrativeRequest::new(resolve(&scores).archetype, scores)
}

/// App wired to in-memory collaborators, returned alongside them
pub struct TestApp {
    pub app: TrueSelf,
    pub narrator: Arc<ScriptedNarrator>,
    pub referrals: Arc<InMemoryReferralStore>,
    pub payment: Arc<MockPayment>,
}

pub fn setup_test_trueself(narrator: ScriptedNarrator) -> TestApp {
    let config = TrueSelfConfig::new();
    let narrator = Arc::new(narrator);
    let referrals = Arc::new(InMemoryReferralStore::new(config.referral.recent_visitors));
    let payment = Arc::new(MockPayment::new(config.price_label.clone()));

    let app = TrueSelf::new(
        config,
        narrator.clone(),
        referrals.clone(),
        payment.clone(),
    );

    TestApp {
        app,
        narrator,
        referrals,
        payment,
    }
}
