//! Payment capability
//!
//! Real processing is out of scope; [`MockPayment`] approves every charge
//! and issues a receipt the paywall gate accepts.

use crate::error::PaymentError;
use crate::types::VisitorId;
use async_trait::async_trait;
use parking_lot::Mutex;
use trueself_quiz::UnlockReceipt;

/// Unlock payment capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Price shown on the paywall
    fn price_label(&self) -> String;

    /// Charge the visitor and return a receipt
    ///
    /// # Errors
    /// - `PaymentError::Declined` if the charge was refused
    /// - `PaymentError::Unavailable` if the provider could not be reached
    async fn charge(&self, visitor: VisitorId) -> Result<UnlockReceipt, PaymentError>;
}

/// Always-approving payment provider
#[derive(Debug)]
pub struct MockPayment {
    price_label: String,
    charges: Mutex<Vec<VisitorId>>,
}

impl MockPayment {
    /// Create provider advertising `price_label`
    #[must_use]
    pub fn new(price_label: impl Into<String>) -> Self {
        Self {
            price_label: price_label.into(),
            charges: Mutex::new(Vec::new()),
        }
    }

    /// Visitors charged so far, in order
    #[must_use]
    pub fn charges(&self) -> Vec<VisitorId> {
        self.charges.lock().clone()
    }
}

impl Default for MockPayment {
    fn default() -> Self {
        Self::new("$1.49")
    }
}

#[async_trait]
impl PaymentProvider for MockPayment {
    fn price_label(&self) -> String {
        self.price_label.clone()
    }

    async fn charge(&self, visitor: VisitorId) -> Result<UnlockReceipt, PaymentError> {
        let n = {
            let mut charges = self.charges.lock();
            charges.push(visitor);
            charges.len()
        };
        tracing::info!(visitor = %visitor, price = %self.price_label, "mock payment approved");
        Ok(UnlockReceipt::new(format!("mock-{n}-{visitor}")))
    }
}
