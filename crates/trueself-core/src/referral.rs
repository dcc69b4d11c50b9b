//! Referral program bookkeeping
//!
//! A referral code is registered by its owner, shared as `?ref=<code>`, and
//! counts first-touch visits and paid conversions of those visits.

use crate::error::ReferralError;
use crate::types::{ReferralCode, VisitorId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Action names accepted by the tracking endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralAction {
    /// Record a first-touch visit
    Visit,
    /// Mark a visit converted
    Paid,
    /// Register a code
    Create,
    /// Read counters and recent visitors
    Stats,
}

impl ReferralAction {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visit => "visit",
            Self::Paid => "paid",
            Self::Create => "create",
            Self::Stats => "stats",
        }
    }
}

impl FromStr for ReferralAction {
    type Err = ReferralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visit" => Ok(Self::Visit),
            "paid" => Ok(Self::Paid),
            "create" => Ok(Self::Create),
            "stats" => Ok(Self::Stats),
            other => Err(ReferralError::InvalidAction(other.to_string())),
        }
    }
}

/// Tracking request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRequest {
    /// Action name
    pub action: String,
    /// Raw referral code
    pub referral_code: String,
    /// Visitor, for `visit` and `paid`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<VisitorId>,
    /// Owner name, for `create`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer_name: Option<String>,
}

impl TrackRequest {
    /// Request for an action on a code
    #[must_use]
    pub fn new(action: ReferralAction, code: &ReferralCode) -> Self {
        Self {
            action: action.as_str().to_string(),
            referral_code: code.to_string(),
            visitor_id: None,
            referrer_name: None,
        }
    }

    /// With visitor
    #[inline]
    #[must_use]
    pub fn with_visitor(mut self, visitor: VisitorId) -> Self {
        self.visitor_id = Some(visitor);
        self
    }

    /// With owner name
    #[inline]
    #[must_use]
    pub fn with_referrer_name(mut self, name: impl Into<String>) -> Self {
        self.referrer_name = Some(name.into());
        self
    }
}

/// Tracking response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackResponse {
    /// Counters and visitors
    Stats(ReferralStats),
    /// Acknowledgement for visit, paid, create
    Ack {
        /// Always true
        ok: bool,
        /// Whether the call changed any counter or record
        #[serde(default)]
        changed: bool,
    },
}

impl TrackResponse {
    fn ack(changed: bool) -> Self {
        Self::Ack { ok: true, changed }
    }
}

/// One visitor record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Visitor
    pub visitor_id: VisitorId,
    /// First-touch time
    pub visited_at: DateTime<Utc>,
    /// Converted
    pub paid: bool,
    /// Conversion time
    pub paid_at: Option<DateTime<Utc>>,
}

/// Referral counters plus recent visitors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralStats {
    /// Owner name
    pub referrer_name: String,
    /// Code
    pub referral_code: ReferralCode,
    /// First-touch visits
    pub click_count: u64,
    /// Conversions
    pub paid_count: u64,
    /// Registration time
    pub created_at: DateTime<Utc>,
    /// Most recent first
    pub visitors: Vec<VisitRecord>,
}

impl ReferralStats {
    /// Conversion rate as a percentage with one decimal, `"0"` without clicks
    #[must_use]
    pub fn conversion_rate(&self) -> String {
        if self.click_count == 0 {
            return "0".to_string();
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.paid_count as f64 / self.click_count as f64 * 100.0;
        format!("{rate:.1}")
    }

    /// Share link under `origin`
    #[must_use]
    pub fn share_link(&self, origin: &str) -> String {
        self.referral_code.share_link(origin)
    }
}

/// Referral tracking capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralTracker: Send + Sync {
    /// Record a visit. Returns `true` on first touch.
    ///
    /// # Errors
    /// - `ReferralError::NotFound` if the code is not registered
    async fn visit(&self, code: &ReferralCode, visitor: VisitorId) -> Result<bool, ReferralError>;

    /// Mark a visit converted. Returns `true` when this call converted it.
    ///
    /// # Errors
    /// - `ReferralError::NotFound` if the code is not registered
    async fn paid(&self, code: &ReferralCode, visitor: VisitorId) -> Result<bool, ReferralError>;

    /// Register a code for an owner
    ///
    /// # Errors
    /// - `ReferralError::Conflict` if the code exists
    async fn create(&self, code: &ReferralCode, referrer_name: &str) -> Result<(), ReferralError>;

    /// Counters and recent visitors
    ///
    /// # Errors
    /// - `ReferralError::NotFound` if the code is not registered
    async fn stats(&self, code: &ReferralCode) -> Result<ReferralStats, ReferralError>;
}

/// Apply a tracking request against a tracker
///
/// # Errors
/// - `ReferralError::InvalidAction` for unknown actions
/// - `ReferralError::InvalidCode` for codes empty after normalization
/// - `ReferralError::MissingVisitor` / `MissingName` for absent fields
/// - whatever the tracker reports
pub async fn dispatch(
    tracker: &dyn ReferralTracker,
    request: TrackRequest,
) -> Result<TrackResponse, ReferralError> {
    let action: ReferralAction = request.action.parse()?;
    let code = ReferralCode::parse(&request.referral_code)?;

    match action {
        ReferralAction::Visit => {
            let visitor = request.visitor_id.ok_or(ReferralError::MissingVisitor)?;
            tracker.visit(&code, visitor).await.map(TrackResponse::ack)
        }
        ReferralAction::Paid => {
            let visitor = request.visitor_id.ok_or(ReferralError::MissingVisitor)?;
            tracker.paid(&code, visitor).await.map(TrackResponse::ack)
        }
        ReferralAction::Create => {
            let name = request
                .referrer_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or(ReferralError::MissingName)?;
            tracker.create(&code, name).await?;
            Ok(TrackResponse::ack(true))
        }
        ReferralAction::Stats => tracker.stats(&code).await.map(TrackResponse::Stats),
    }
}

#[derive(Debug)]
struct ReferralEntry {
    referrer_name: String,
    created_at: DateTime<Utc>,
    click_count: u64,
    paid_count: u64,
    visits: Vec<VisitRecord>,
}

/// Process-local referral store
#[derive(Debug)]
pub struct InMemoryReferralStore {
    entries: DashMap<ReferralCode, ReferralEntry>,
    recent_visitors: usize,
}

impl Default for InMemoryReferralStore {
    fn default() -> Self {
        Self::new(50)
    }
}

impl InMemoryReferralStore {
    /// Create store returning at most `recent_visitors` visitors from `stats`
    #[inline]
    #[must_use]
    pub fn new(recent_visitors: usize) -> Self {
        Self {
            entries: DashMap::new(),
            recent_visitors,
        }
    }

    /// Registered code count
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no codes are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ReferralTracker for InMemoryReferralStore {
    async fn visit(&self, code: &ReferralCode, visitor: VisitorId) -> Result<bool, ReferralError> {
        let mut entry = self
            .entries
            .get_mut(code)
            .ok_or_else(|| ReferralError::NotFound(code.to_string()))?;

        if entry.visits.iter().any(|v| v.visitor_id == visitor) {
            return Ok(false);
        }
        entry.visits.push(VisitRecord {
            visitor_id: visitor,
            visited_at: Utc::now(),
            paid: false,
            paid_at: None,
        });
        entry.click_count += 1;
        tracing::info!(code = %code, visitor = %visitor, clicks = entry.click_count, "referral visit");
        Ok(true)
    }

    async fn paid(&self, code: &ReferralCode, visitor: VisitorId) -> Result<bool, ReferralError> {
        let mut entry = self
            .entries
            .get_mut(code)
            .ok_or_else(|| ReferralError::NotFound(code.to_string()))?;

        let Some(visit) = entry.visits.iter_mut().find(|v| v.visitor_id == visitor) else {
            tracing::debug!(code = %code, visitor = %visitor, "paid without recorded visit");
            return Ok(false);
        };
        if visit.paid {
            return Ok(false);
        }
        visit.paid = true;
        visit.paid_at = Some(Utc::now());
        entry.paid_count += 1;
        tracing::info!(code = %code, visitor = %visitor, paid = entry.paid_count, "referral converted");
        Ok(true)
    }

    async fn create(&self, code: &ReferralCode, referrer_name: &str) -> Result<(), ReferralError> {
        match self.entries.entry(code.clone()) {
            Entry::Occupied(_) => Err(ReferralError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(ReferralEntry {
                    referrer_name: referrer_name.to_string(),
                    created_at: Utc::now(),
                    click_count: 0,
                    paid_count: 0,
                    visits: Vec::new(),
                });
                tracing::info!(code = %code, "referral code created");
                Ok(())
            }
        }
    }

    async fn stats(&self, code: &ReferralCode) -> Result<ReferralStats, ReferralError> {
        let entry = self
            .entries
            .get(code)
            .ok_or_else(|| ReferralError::NotFound(code.to_string()))?;

        let visitors = entry
            .visits
            .iter()
            .rev()
            .take(self.recent_visitors)
            .cloned()
            .collect();

        Ok(ReferralStats {
            referrer_name: entry.referrer_name.clone(),
            referral_code: code.clone(),
            click_count: entry.click_count,
            paid_count: entry.paid_count,
            created_at: entry.created_at,
            visitors,
        })
    }
}
