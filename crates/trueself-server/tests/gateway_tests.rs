//! Gateway & Functions Client Tests
//!
//! Runs a fake chat-completions upstream and the real routes on ephemeral
//! ports, then talks to them over HTTP.

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use trueself_core::{
    ChatGateway, FunctionsClient, InMemoryReferralStore, NarrativeError, NarrativeGenerator,
    ReferralCode, ReferralError, ReferralTracker, VisitorId,
};
use trueself_server::{routes, AppState};
use trueself_test_utils::{sample_request, ScriptedNarrator};
use warp::http::StatusCode;
use warp::Filter;

type Seen = Arc<Mutex<Option<(String, Value)>>>;

fn fake_gateway(status: u16, content: &'static str) -> (SocketAddr, Seen) {
    let seen: Seen = Arc::new(Mutex::new(None));
    let record = seen.clone();

    let route = warp::path!("v1" / "chat" / "completions")
        .and(warp::post())
        .and(warp::header::<String>("authorization"))
        .and(warp::body::json())
        .map(move |auth: String, body: Value| {
            *record.lock().unwrap() = Some((auth, body));
            let reply = if status == 200 {
                json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
            } else {
                json!({ "error": "upstream says no" })
            };
            warp::reply::with_status(
                warp::reply::json(&reply),
                StatusCode::from_u16(status).unwrap(),
            )
        });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, seen)
}

fn gateway(addr: SocketAddr) -> ChatGateway {
    ChatGateway::new(format!("http://{addr}/v1/"), "test-model", "secret").unwrap()
}

fn serve_routes(state: AppState) -> FunctionsClient {
    let (addr, server) = warp::serve(routes(state)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    FunctionsClient::new(format!("http://{addr}"))
}

#[tokio::test]
async fn roast_sends_chat_request() {
    let (addr, seen) = fake_gateway(200, "You schedule spontaneity.");

    let text = gateway(addr).roast(&sample_request()).await.unwrap();
    assert_eq!(text, "You schedule spontaneity.");

    let (auth, body) = seen.lock().unwrap().take().unwrap();
    assert_eq!(auth, "Bearer secret");
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("The Mastermind"));
}

#[tokio::test]
async fn report_strips_fences() {
    let (addr, _) = fake_gateway(
        200,
        "```json\n{\"sections\":[{\"title\":\"Executive Summary\",\"content\":\"Bold.\"}]}\n```",
    );

    let report = gateway(addr).report(&sample_request()).await.unwrap();
    assert_eq!(report.sections.len(), 1);
    assert_eq!(report.sections[0].content, "Bold.");
}

#[tokio::test]
async fn upstream_statuses_map_to_errors() {
    let (addr, _) = fake_gateway(429, "");
    assert_eq!(
        gateway(addr).roast(&sample_request()).await,
        Err(NarrativeError::RateLimited)
    );

    let (addr, _) = fake_gateway(402, "");
    assert_eq!(
        gateway(addr).roast(&sample_request()).await,
        Err(NarrativeError::PaymentRequired)
    );

    let (addr, _) = fake_gateway(503, "");
    assert!(matches!(
        gateway(addr).report(&sample_request()).await,
        Err(NarrativeError::Gateway { status: 503, .. })
    ));
}

#[tokio::test]
async fn functions_client_through_server_and_gateway() {
    let (addr, _) = fake_gateway(200, "not json at all");
    let state = AppState::new(
        Arc::new(gateway(addr)),
        Arc::new(InMemoryReferralStore::default()),
    );
    let client = serve_routes(state);

    assert_eq!(
        client.roast(&sample_request()).await.unwrap(),
        "not json at all"
    );

    let err = client.report(&sample_request()).await.unwrap_err();
    assert!(matches!(err, NarrativeError::Parse(_)));
    assert_eq!(err.user_message(), "Failed to parse report");
}

#[tokio::test]
async fn functions_client_maps_narrative_statuses() {
    let client = serve_routes(AppState::new(
        Arc::new(ScriptedNarrator::failing(NarrativeError::RateLimited)),
        Arc::new(InMemoryReferralStore::default()),
    ));

    let err = client.roast(&sample_request()).await.unwrap_err();
    assert_eq!(err, NarrativeError::RateLimited);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn functions_client_as_referral_tracker() {
    let client = serve_routes(AppState::new(
        Arc::new(ScriptedNarrator::new("x")),
        Arc::new(InMemoryReferralStore::default()),
    ));
    let code = ReferralCode::parse("carol").unwrap();
    let visitor = VisitorId::new();

    client.create(&code, "Carol").await.unwrap();
    assert_eq!(
        client.create(&code, "Carol").await,
        Err(ReferralError::Conflict("carol".into()))
    );

    assert!(client.visit(&code, visitor).await.unwrap());
    assert!(!client.visit(&code, visitor).await.unwrap());
    assert!(client.paid(&code, visitor).await.unwrap());

    let stats = client.stats(&code).await.unwrap();
    assert_eq!(stats.click_count, 1);
    assert_eq!(stats.paid_count, 1);
    assert_eq!(stats.conversion_rate(), "100.0");

    let ghost = ReferralCode::parse("ghost").unwrap();
    assert_eq!(
        client.stats(&ghost).await,
        Err(ReferralError::NotFound("ghost".into()))
    );
}
