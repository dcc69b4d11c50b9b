//! Identifier types shared across the core

use crate::error::ReferralError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Anonymous per-browser visitor identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorId(pub Uuid);

impl VisitorId {
    /// Generate a new random visitor id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VisitorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for VisitorId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Normalized referral code
///
/// Lowercase, restricted to `[a-z0-9-_]`, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Normalize raw input: trim, lowercase, drop disallowed characters
    pub fn parse(raw: &str) -> Result<Self, ReferralError> {
        let code: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if code.is_empty() {
            return Err(ReferralError::InvalidCode(raw.to_string()));
        }
        Ok(Self(code))
    }

    /// Code text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Share link for this code under `origin`
    #[must_use]
    pub fn share_link(&self, origin: &str) -> String {
        format!("{}?ref={}", origin.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ReferralCode {
    type Error = ReferralError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReferralCode> for String {
    fn from(code: ReferralCode) -> Self {
        code.0
    }
}

/// Per-session visitor context
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisitorContext {
    /// Visitor identity
    pub visitor_id: VisitorId,
    /// Referral code captured on landing
    pub referral_code: Option<ReferralCode>,
}

impl VisitorContext {
    /// Fresh context with no referral
    #[inline]
    #[must_use]
    pub fn new(visitor_id: VisitorId) -> Self {
        Self {
            visitor_id,
            referral_code: None,
        }
    }

    /// Capture `ref=` from a landing URL query string
    ///
    /// The first valid code wins; later captures are ignored. Returns the
    /// code when one was newly captured.
    pub fn capture_query(&mut self, query: &str) -> Option<&ReferralCode> {
        if self.referral_code.is_some() {
            return None;
        }
        let raw = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == "ref")
            .map(|(_, v)| v)?;
        let decoded = match urlencoding::decode(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring undecodable referral code");
                return None;
            }
        };
        match ReferralCode::parse(&decoded) {
            Ok(code) => {
                tracing::debug!(code = %code, visitor = %self.visitor_id, "referral captured");
                self.referral_code = Some(code);
                self.referral_code.as_ref()
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring malformed referral code");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_normalization() {
        assert_eq!(ReferralCode::parse("  My-Code_1! ").unwrap().as_str(), "my-code_1");
        assert!(matches!(
            ReferralCode::parse(" !!! "),
            Err(ReferralError::InvalidCode(_))
        ));
    }

    #[test]
    fn share_link() {
        let code = ReferralCode::parse("alice").unwrap();
        assert_eq!(code.share_link("https://x.app/"), "https://x.app?ref=alice");
    }

    #[test]
    fn code_serde_normalizes() {
        let code: ReferralCode = serde_json::from_str("\"BOB\"").unwrap();
        assert_eq!(code.as_str(), "bob");
        assert!(serde_json::from_str::<ReferralCode>("\"\"").is_err());
    }

    #[test]
    fn capture_first_ref_only() {
        let mut ctx = VisitorContext::new(VisitorId::new());
        assert_eq!(
            ctx.capture_query("?utm=x&ref=Alice").map(ReferralCode::as_str),
            Some("alice")
        );
        assert!(ctx.capture_query("?ref=bob").is_none());
        assert_eq!(ctx.referral_code.as_ref().unwrap().as_str(), "alice");
    }

    #[test]
    fn capture_decodes_percent_escapes() {
        let mut ctx = VisitorContext::default();
        assert_eq!(
            ctx.capture_query("?ref=a%2Db").map(ReferralCode::as_str),
            Some("a-b")
        );

        let mut ctx = VisitorContext::default();
        assert!(ctx.capture_query("?ref=%FF%FE").is_none());
        assert!(ctx.referral_code.is_none());
    }

    #[test]
    fn capture_without_ref() {
        let mut ctx = VisitorContext::default();
        assert!(ctx.capture_query("a=1&b=2").is_none());
        assert!(ctx.capture_query("ref=%%%").is_none());
        assert!(ctx.referral_code.is_none());
    }

    #[test]
    fn visitor_id_round_trips_text() {
        let id = VisitorId::new();
        assert_eq!(id.to_string().parse::<VisitorId>().unwrap(), id);
    }
}
