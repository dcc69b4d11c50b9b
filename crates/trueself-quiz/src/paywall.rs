//! Paywall gate and results-screen phases
//!
//! While the gate is locked only the teaser (name, emoji, short description)
//! can be produced. The dimension breakdown and narrative require an unlock.

use crate::archetype::Archetype;
use crate::card::ResultCard;
use crate::score::ScoreVector;
use serde::{Deserialize, Serialize};

/// Gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    /// Full results withheld
    #[default]
    Locked,
    /// Full results visible
    Unlocked,
}

/// Proof of a completed unlock, supplied by the payment collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockReceipt {
    /// Payment or grant reference
    pub reference: String,
}

impl UnlockReceipt {
    /// Create receipt
    #[inline]
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// Locked view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teaser {
    /// Archetype name
    pub name: String,
    /// Archetype emoji
    pub emoji: String,
    /// Short description
    pub description: String,
}

/// Unlocked view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullResult<N> {
    /// Card with dimension breakdown
    pub card: ResultCard,
    /// Narrative, if one is available yet
    pub narrative: Option<N>,
}

/// What the results screen may show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ResultView<N> {
    /// Pre-unlock teaser
    Teaser(Teaser),
    /// Post-unlock result
    Full(FullResult<N>),
}

/// Two-state unlock gate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaywallGate {
    gate: Gate,
    receipt: Option<UnlockReceipt>,
}

impl PaywallGate {
    /// New locked gate
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn gate(&self) -> Gate {
        self.gate
    }

    /// Whether full results are visible
    #[inline]
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.gate == Gate::Unlocked
    }

    /// Receipt that unlocked the gate
    #[inline]
    #[must_use]
    pub fn receipt(&self) -> Option<&UnlockReceipt> {
        self.receipt.as_ref()
    }

    /// Unlock with a receipt. Returns `false` if already unlocked; the
    /// original receipt is kept.
    pub fn unlock(&mut self, receipt: UnlockReceipt) -> bool {
        if self.is_unlocked() {
            return false;
        }
        tracing::info!(reference = %receipt.reference, "paywall unlocked");
        self.gate = Gate::Unlocked;
        self.receipt = Some(receipt);
        true
    }

    /// View permitted by the current gate state
    ///
    /// The narrative is dropped unread while locked.
    #[must_use]
    pub fn view<N>(
        &self,
        archetype: &Archetype,
        scores: &ScoreVector,
        narrative: Option<N>,
    ) -> ResultView<N> {
        match self.gate {
            Gate::Locked => ResultView::Teaser(Teaser {
                name: archetype.name.clone(),
                emoji: archetype.emoji.clone(),
                description: archetype.description.clone(),
            }),
            Gate::Unlocked => ResultView::Full(FullResult {
                card: ResultCard::new(archetype, scores),
                narrative,
            }),
        }
    }
}

/// Results-screen phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPhase {
    /// "Calculating..." animation
    #[default]
    Calculating,
    /// Locked paywall
    Paywall,
    /// Unlocked result
    Result,
}

impl RevealPhase {
    /// Next phase given the gate
    ///
    /// Calculating always passes through the paywall unless the gate is
    /// already open; the paywall only yields once unlocked.
    #[must_use]
    pub fn advance(self, gate: &PaywallGate) -> Self {
        match (self, gate.is_unlocked()) {
            (Self::Calculating, false) => Self::Paywall,
            (Self::Calculating | Self::Paywall | Self::Result, true) | (Self::Result, false) => {
                Self::Result
            }
            (Self::Paywall, false) => Self::Paywall,
        }
    }
}
