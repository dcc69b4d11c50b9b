//! Runtime configuration
//!
//! Loaded from TOML; every section and field has a default so an empty file
//! is a valid configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default chat-completions gateway
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1";

/// Default model name
pub const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";

/// Default environment variable holding the gateway key
pub const DEFAULT_API_KEY_ENV: &str = "TRUESELF_AI_API_KEY";

/// Text shown when the roast is unavailable
pub const DEFAULT_FALLBACK_TEXT: &str =
    "Your personality is so unique, even our AI needs a moment. 🤔";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrueSelfConfig {
    /// AI gateway
    pub gateway: GatewayConfig,
    /// Results reveal timing
    pub reveal: RevealConfig,
    /// Referral program
    pub referral: ReferralConfig,
    /// HTTP server
    pub server: ServerConfig,
    /// Unlock price shown on the paywall
    pub price_label: String,
}

impl Default for TrueSelfConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            reveal: RevealConfig::default(),
            referral: ReferralConfig::default(),
            server: ServerConfig::default(),
            price_label: "$1.49".to_string(),
        }
    }
}

impl TrueSelfConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("gateway.base_url is empty".into()));
        }
        if self.gateway.model.trim().is_empty() {
            return Err(ConfigError::Invalid("gateway.model is empty".into()));
        }
        if self.reveal.extended_calculating_ms < self.reveal.min_calculating_ms {
            return Err(ConfigError::Invalid(format!(
                "reveal.extended_calculating_ms ({}) is shorter than reveal.min_calculating_ms ({})",
                self.reveal.extended_calculating_ms, self.reveal.min_calculating_ms
            )));
        }
        if self.referral.recent_visitors == 0 {
            return Err(ConfigError::Invalid(
                "referral.recent_visitors must be positive".into(),
            ));
        }
        Ok(())
    }

    /// With gateway base URL
    #[inline]
    #[must_use]
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway.base_url = url.into();
        self
    }

    /// With model name
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.gateway.model = model.into();
        self
    }

    /// With reveal windows
    #[inline]
    #[must_use]
    pub fn with_reveal_windows(mut self, min_ms: u64, extended_ms: u64) -> Self {
        self.reveal.min_calculating_ms = min_ms;
        self.reveal.extended_calculating_ms = extended_ms;
        self
    }

    /// With server listen address
    #[inline]
    #[must_use]
    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.server.addr = addr.into();
        self
    }
}

/// AI gateway settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// Model name sent with each request
    pub model: String,
    /// Environment variable holding the bearer key
    pub api_key_env: String,
    /// Request timeout
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 60,
        }
    }
}

impl GatewayConfig {
    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the key from the configured environment variable
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

/// Results reveal timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Minimum time the calculating screen is shown
    pub min_calculating_ms: u64,
    /// Total time to wait for the roast before falling back
    pub extended_calculating_ms: u64,
    /// Text used when the roast is late or failed
    pub fallback_text: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            min_calculating_ms: 2500,
            extended_calculating_ms: 4000,
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}

impl RevealConfig {
    /// Minimum window
    #[inline]
    #[must_use]
    pub fn min_window(&self) -> Duration {
        Duration::from_millis(self.min_calculating_ms)
    }

    /// Extended window
    #[inline]
    #[must_use]
    pub fn extended_window(&self) -> Duration {
        Duration::from_millis(self.extended_calculating_ms)
    }
}

/// Referral program settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferralConfig {
    /// Visitors returned by `stats`
    pub recent_visitors: usize,
    /// Origin used to build share links
    pub site_origin: String,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            recent_visitors: 50,
            site_origin: "https://trueself.app".to_string(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// Default log filter
    pub log_level: String,
    /// Emit JSON log lines
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8787".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        let config = TrueSelfConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrueSelfConfig::default());
        assert_eq!(config.reveal.min_calculating_ms, 2500);
        assert_eq!(config.reveal.extended_calculating_ms, 4000);
        assert_eq!(config.price_label, "$1.49");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = TrueSelfConfig::from_toml_str(
            r#"
            price_label = "$2.99"

            [gateway]
            model = "some/model"

            [server]
            json_logs = true
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.model, "some/model");
        assert_eq!(config.gateway.base_url, DEFAULT_GATEWAY_URL);
        assert!(config.server.json_logs);
        assert_eq!(config.server.addr, "127.0.0.1:8787");
        assert_eq!(config.price_label, "$2.99");
    }

    #[test]
    fn extended_shorter_than_min_is_rejected() {
        let err = TrueSelfConfig::from_toml_str(
            "[reveal]\nmin_calculating_ms = 3000\nextended_calculating_ms = 1000\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_model_and_zero_visitors_are_rejected() {
        assert!(TrueSelfConfig::new().with_model(" ").validate().is_err());

        let mut config = TrueSelfConfig::new();
        config.referral.recent_visitors = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = TrueSelfConfig::from_toml_str("[reveal\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\naddr = \"0.0.0.0:9000\"").unwrap();

        let config = TrueSelfConfig::load(file.path()).unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:9000");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrueSelfConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn builders() {
        let config = TrueSelfConfig::new()
            .with_gateway_url("http://localhost:1")
            .with_reveal_windows(10, 20)
            .with_addr("127.0.0.1:0");
        assert_eq!(config.gateway.base_url, "http://localhost:1");
        assert_eq!(config.reveal.min_window(), Duration::from_millis(10));
        assert_eq!(config.reveal.extended_window(), Duration::from_millis(20));
        assert!(config.validate().is_ok());
    }
}
