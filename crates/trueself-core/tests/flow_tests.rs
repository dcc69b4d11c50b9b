//! Flow Integration Tests
//!
//! Reveal timing runs on a paused clock; referral bookkeeping is awaited
//! through the detached task handles.

use std::time::Duration;
use trueself_core::{
    NarrativeError, ReferralCode, ReferralError, ReferralTracker, RevealSource, TrueSelfError,
    VisitorContext, VisitorId,
};
use trueself_quiz::{ResultView, RevealPhase};
use trueself_test_utils::{same_answers, scripted_scores, setup_test_trueself, ScriptedNarrator};

#[tokio::test(start_paused = true)]
async fn roast_between_windows_is_shown() {
    let t = setup_test_trueself(
        ScriptedNarrator::new("you alphabetize your feelings").with_delay(Duration::from_secs(3)),
    );

    let session = t.app.calculate(scripted_scores(&[0; 20])).await;

    assert_eq!(session.reveal.source, RevealSource::Generated);
    assert_eq!(session.roast(), "you alphabetize your feelings");
    assert_eq!(session.reveal.waited, Duration::from_secs(3));
    assert_eq!(session.phase(), RevealPhase::Paywall);
}

#[tokio::test(start_paused = true)]
async fn slow_roast_falls_back_then_arrives_late() {
    let t = setup_test_trueself(
        ScriptedNarrator::new("late but honest").with_delay(Duration::from_secs(10)),
    );

    let mut session = t.app.calculate(scripted_scores(&[1; 20])).await;

    assert_eq!(session.reveal.source, RevealSource::TimedOut);
    assert_eq!(session.reveal.waited, Duration::from_millis(4000));
    assert_eq!(session.roast(), t.app.config().reveal.fallback_text);
    assert!(!session.roast_generated());

    assert!(session.await_late_roast().await);
    assert_eq!(session.roast(), "late but honest");
    assert!(!session.await_late_roast().await);
    assert_eq!(t.narrator.roast_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn failing_roast_uses_fallback() {
    let t = setup_test_trueself(ScriptedNarrator::failing(NarrativeError::RateLimited));

    let session = t.app.calculate(scripted_scores(&[2; 20])).await;

    assert_eq!(session.reveal.source, RevealSource::Failed);
    assert_eq!(session.reveal.waited, Duration::from_millis(2500));
    assert!(session.reveal.pending.is_none());
}

#[tokio::test(start_paused = true)]
async fn referred_visitor_unlocks_and_converts() {
    let t = setup_test_trueself(ScriptedNarrator::new("roast"));
    let code = ReferralCode::parse("alice").unwrap();
    assert_eq!(
        t.app.create_referral(&code, "Alice").await.unwrap(),
        "https://trueself.app?ref=alice"
    );
    assert!(matches!(
        t.app.create_referral(&code, "Mallory").await,
        Err(TrueSelfError::Referral(ReferralError::Conflict(_)))
    ));

    let mut visitor = VisitorContext::new(VisitorId::new());
    t.app
        .land(&mut visitor, "?ref=Alice")
        .expect("code should be captured")
        .await
        .unwrap();
    assert!(t.app.land(&mut visitor, "?ref=alice").is_none());

    let mut session = t.app.calculate(scripted_scores(&same_answers(t.app.bank(), 0))).await;
    assert!(matches!(session.view(), ResultView::Teaser(_)));
    assert!(matches!(
        t.app.report(&session).await,
        Err(TrueSelfError::Locked)
    ));

    assert!(t.app.unlock(&mut session, &visitor).await.unwrap());
    assert_eq!(session.phase(), RevealPhase::Result);
    session.take_conversion().unwrap().await.unwrap();

    assert!(!t.app.unlock(&mut session, &visitor).await.unwrap());
    assert_eq!(t.payment.charges(), vec![visitor.visitor_id]);

    let stats = t.referrals.stats(&code).await.unwrap();
    assert_eq!(stats.click_count, 1);
    assert_eq!(stats.paid_count, 1);

    match session.view() {
        ResultView::Full(full) => {
            assert_eq!(full.card.archetype.name, "The Mastermind");
            assert_eq!(full.narrative.as_deref(), Some("roast"));
        }
        ResultView::Teaser(_) => panic!("expected full view after unlock"),
    }

    let report = t.app.report(&session).await.unwrap();
    assert_eq!(report.sections.len(), 15);
    assert_eq!(t.narrator.report_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_referral_code_never_blocks() {
    let t = setup_test_trueself(ScriptedNarrator::new("roast"));
    let mut visitor = VisitorContext::default();

    t.app
        .land(&mut visitor, "ref=ghost")
        .unwrap()
        .await
        .unwrap();

    let mut session = t.app.calculate(scripted_scores(&[0; 20])).await;
    assert!(t.app.unlock(&mut session, &visitor).await.unwrap());
    session.take_conversion().unwrap().await.unwrap();
    assert!(t.referrals.is_empty());
}

#[tokio::test(start_paused = true)]
async fn report_failure_surfaces_user_message() {
    let t = setup_test_trueself(
        ScriptedNarrator::new("roast").with_report(Err(NarrativeError::PaymentRequired)),
    );
    let visitor = VisitorContext::default();

    let mut session = t.app.calculate(scripted_scores(&[3; 20])).await;
    assert!(session.take_conversion().is_none());
    t.app.unlock(&mut session, &visitor).await.unwrap();
    assert!(session.take_conversion().is_none());

    match t.app.report(&session).await {
        Err(TrueSelfError::Narrative(e)) => {
            assert_eq!(e.user_message(), "Payment required.");
            assert!(e.is_fatal_for_session());
        }
        other => panic!("expected narrative error, got {other:?}"),
    }
}
