//! OpenAI-compatible chat-completions client

use super::{parse_report, prompt, NarrativeGenerator, NarrativeRequest, Report};
use crate::config::GatewayConfig;
use crate::error::NarrativeError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Narrative generator backed by a chat-completions gateway
#[derive(Debug, Clone)]
pub struct ChatGateway {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ChatGateway {
    /// Create gateway with an explicit key
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, NarrativeError> {
        Self::with_client(Client::new(), base_url, model, api_key)
    }

    /// Create gateway from configuration, reading the key from the environment
    pub fn from_config(config: &GatewayConfig) -> Result<Self, NarrativeError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| NarrativeError::MissingApiKey(config.api_key_env.clone()))?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| NarrativeError::Transport(e.to_string()))?;
        Self::with_client(client, &config.base_url, &config.model, api_key)
    }

    fn with_client(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, NarrativeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(NarrativeError::MissingApiKey("api key".into()));
        }
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    /// Model name sent with each request
    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one system + user exchange and return the first choice's content
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, NarrativeError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NarrativeError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let err = NarrativeError::from_status(status.as_u16(), text);
            match &err {
                NarrativeError::Gateway { status, body } => {
                    tracing::error!(status, body = %body, "AI gateway error");
                }
                other => tracing::warn!(error = %other, "AI gateway refused request"),
            }
            return Err(err);
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| NarrativeError::Parse(e.to_string()))?;

        Ok(json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}

#[async_trait]
impl NarrativeGenerator for ChatGateway {
    async fn roast(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        tracing::debug!(archetype = %request.archetype.name, model = %self.model, "generating roast");
        self.complete(prompt::ROAST_SYSTEM, &prompt::roast_user(request))
            .await
    }

    async fn report(&self, request: &NarrativeRequest) -> Result<Report, NarrativeError> {
        tracing::debug!(archetype = %request.archetype.name, model = %self.model, "generating report");
        let text = self
            .complete(&prompt::report_system(), &prompt::report_user(request))
            .await?;
        parse_report(&text)
    }
}
