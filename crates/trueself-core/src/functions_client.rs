//! Client for the HTTP functions
//!
//! Lets a front end reach narrative generation and referral tracking over
//! HTTP through the same capability traits the in-process implementations
//! use.

use crate::error::{NarrativeError, ReferralError};
use crate::narrative::{NarrativeGenerator, NarrativeRequest, Report, RoastText};
use crate::referral::{ReferralAction, ReferralStats, ReferralTracker, TrackRequest, TrackResponse};
use crate::types::{ReferralCode, VisitorId};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error body returned by every function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// User-facing message
    pub error: String,
}

/// HTTP client for `/functions/*`
#[derive(Debug, Clone)]
pub struct FunctionsClient {
    client: Client,
    base_url: String,
}

impl FunctionsClient {
    /// Create client for a server at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create client reusing an existing connection pool
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, function: &str) -> String {
        format!("{}/functions/{function}", self.base_url)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        function: &str,
        body: &B,
    ) -> Result<Response, reqwest::Error> {
        self.client.post(self.url(function)).json(body).send().await
    }

    /// Send a raw tracking request
    ///
    /// # Errors
    /// - the `ReferralError` matching the response status
    pub async fn track(&self, request: &TrackRequest) -> Result<TrackResponse, ReferralError> {
        let res = self
            .post("track-referral", request)
            .await
            .map_err(|e| ReferralError::Transport(e.to_string()))?;

        let status = res.status();
        if status.is_success() {
            return res
                .json()
                .await
                .map_err(|e| ReferralError::Transport(e.to_string()));
        }

        let message = error_message(res).await;
        let code = request.referral_code.clone();
        Err(match status {
            StatusCode::NOT_FOUND => ReferralError::NotFound(code),
            StatusCode::CONFLICT => ReferralError::Conflict(code),
            StatusCode::BAD_REQUEST if message == "Invalid action" => {
                ReferralError::InvalidAction(request.action.clone())
            }
            StatusCode::BAD_REQUEST => ReferralError::InvalidCode(code),
            _ => ReferralError::Transport(format!("{status}: {message}")),
        })
    }

    async fn narrative<T: DeserializeOwned>(
        &self,
        function: &str,
        request: &NarrativeRequest,
    ) -> Result<T, NarrativeError> {
        let res = self
            .post(function, request)
            .await
            .map_err(|e| NarrativeError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let message = error_message(res).await;
            if message == NarrativeError::Parse(String::new()).user_message() {
                return Err(NarrativeError::Parse(message));
            }
            return Err(NarrativeError::from_status(status.as_u16(), message));
        }
        res.json()
            .await
            .map_err(|e| NarrativeError::Parse(e.to_string()))
    }
}

async fn error_message(res: Response) -> String {
    let text = res.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&text).map_or(text, |b| b.error)
}

#[async_trait]
impl NarrativeGenerator for FunctionsClient {
    async fn roast(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        let body: RoastText = self.narrative("generate-result", request).await?;
        Ok(body.text)
    }

    async fn report(&self, request: &NarrativeRequest) -> Result<Report, NarrativeError> {
        self.narrative("generate-report", request).await
    }
}

fn changed(response: TrackResponse) -> Result<bool, ReferralError> {
    match response {
        TrackResponse::Ack { changed, .. } => Ok(changed),
        TrackResponse::Stats(_) => Err(ReferralError::Transport(
            "unexpected stats response".into(),
        )),
    }
}

#[async_trait]
impl ReferralTracker for FunctionsClient {
    async fn visit(&self, code: &ReferralCode, visitor: VisitorId) -> Result<bool, ReferralError> {
        let req = TrackRequest::new(ReferralAction::Visit, code).with_visitor(visitor);
        changed(self.track(&req).await?)
    }

    async fn paid(&self, code: &ReferralCode, visitor: VisitorId) -> Result<bool, ReferralError> {
        let req = TrackRequest::new(ReferralAction::Paid, code).with_visitor(visitor);
        changed(self.track(&req).await?)
    }

    async fn create(&self, code: &ReferralCode, referrer_name: &str) -> Result<(), ReferralError> {
        let req = TrackRequest::new(ReferralAction::Create, code).with_referrer_name(referrer_name);
        changed(self.track(&req).await?).map(|_| ())
    }

    async fn stats(&self, code: &ReferralCode) -> Result<ReferralStats, ReferralError> {
        match self.track(&TrackRequest::new(ReferralAction::Stats, code)).await? {
            TrackResponse::Stats(stats) => Ok(stats),
            TrackResponse::Ack { .. } => Err(ReferralError::Transport(
                "unexpected acknowledgement for stats".into(),
            )),
        }
    }
}
