//! Order Entity
//!
//! One order row per seller per checkout. Lines and pricing are snapshots
//! taken at checkout time; later catalog or fee edits never reach a placed
//! order. Transition timestamps are stamped by the conditional status
//! update in the repository, named after the destination status.

use serde::{Deserialize, Serialize};
use shared::models::{DeliveryMethod, OrderLine, OrderStatus, PricingBreakdown};
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Customer profile ID
    pub buyer: String,
    /// Business profile ID
    pub seller: String,
    pub lines: Vec<OrderLine>,
    pub delivery_method: DeliveryMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Sum of unit price x quantity, in currency unit
    pub subtotal: f64,
    /// Fee for the chosen delivery method, in currency unit
    pub delivery_fee: f64,
    /// Platform commission in whole currency units
    pub commission: f64,
    /// subtotal + delivery_fee + commission, in currency unit
    pub total: f64,
    /// Gateway reference of the charge that funded this order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_ref: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    /// Whether the delivered amount has cleared the payout hold
    #[serde(default)]
    pub settled: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refunded_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<i64>,
}

impl Order {
    pub fn pricing(&self) -> PricingBreakdown {
        PricingBreakdown {
            subtotal: self.subtotal,
            delivery_fee: self.delivery_fee,
            commission: self.commission,
            total: self.total,
        }
    }

    /// `table:key` form used in API paths and responses
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}
