//! Payment Gateway
//!
//! Checkout charges the buyer through this trait and never learns how the
//! charge happened. A declined or failed charge surfaces as a payment
//! error and checkout stops before any state is written.

use async_trait::async_trait;
use shared::{ApiError, ApiResult};

/// Proof of a successful charge
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    /// Gateway reference, stored on the order
    pub reference: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge `buyer` the checkout total for one seller's order
    ///
    /// Implementations return [`ApiError::PaymentFailed`] when the charge
    /// is declined and must not leave a captured charge behind on error.
    async fn charge(&self, buyer: &str, seller: &str, amount: f64) -> ApiResult<PaymentOutcome>;
}

/// Gateway stand-in that approves every charge
///
/// Default wiring for development and demos. Real deployments inject the
/// platform processor via [`crate::core::ServerState::with_payments`].
#[derive(Debug, Clone, Default)]
pub struct AutoApprovePayments;

impl AutoApprovePayments {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for AutoApprovePayments {
    async fn charge(&self, buyer: &str, seller: &str, amount: f64) -> ApiResult<PaymentOutcome> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ApiError::payment_failed(format!(
                "Cannot charge non-positive amount {amount}"
            )));
        }
        let reference = format!("auto-{}", uuid::Uuid::new_v4());
        tracing::info!(
            buyer = %buyer,
            seller = %seller,
            amount = %amount,
            reference = %reference,
            "Payment auto-approved"
        );
        Ok(PaymentOutcome { reference })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_approve_returns_reference() {
        let gateway = AutoApprovePayments;
        let outcome = gateway.charge("cust1", "biz1", 2600.0).await.unwrap();
        assert!(outcome.reference.starts_with("auto-"));
    }

    #[tokio::test]
    async fn test_auto_approve_rejects_bad_amounts() {
        let gateway = AutoApprovePayments;
        assert!(gateway.charge("cust1", "biz1", 0.0).await.is_err());
        assert!(gateway.charge("cust1", "biz1", -5.0).await.is_err());
    }
}
