//! Order Model
//!
//! Product-order lifecycle. The transition table is the single source of
//! truth for which `(from, actor)` pairs may reach which destination; the
//! server consults it through one entry point and never hand-rolls checks.

use serde::{Deserialize, Serialize};

use super::role::Role;
use super::cart::ItemRef;

/// Order status
///
/// `PENDING → CONFIRMED → PROCESSING → SHIPPED → DELIVERED`, with terminal
/// `CANCELLED` and `REFUNDED` side exits. Terminal statuses admit nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Terminal statuses admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }

    /// Storage field stamped when an order arrives at this status
    ///
    /// `PENDING` is stamped by creation (`created_at`), not by a transition.
    pub fn timestamp_field(&self) -> Option<&'static str> {
        match self {
            Self::Pending => None,
            Self::Confirmed => Some("confirmed_at"),
            Self::Processing => Some("processing_at"),
            Self::Shipped => Some("shipped_at"),
            Self::Delivered => Some("delivered_at"),
            Self::Cancelled => Some("cancelled_at"),
            Self::Refunded => Some("refunded_at"),
        }
    }

    /// Destinations the given role may move an order to from `from`
    ///
    /// The seller walks fulfilment one step at a time and may cancel early;
    /// the buyer may cancel a fresh order and confirm receipt; the admin may
    /// refund anything not yet terminal.
    pub fn destinations(from: OrderStatus, role: Role) -> &'static [OrderStatus] {
        match (from, role) {
            (Self::Pending, Role::Business) => &[Self::Confirmed, Self::Cancelled],
            (Self::Pending, Role::Customer) => &[Self::Cancelled],
            (Self::Confirmed, Role::Business) => &[Self::Processing, Self::Cancelled],
            (Self::Processing, Role::Business) => &[Self::Shipped],
            (Self::Shipped, Role::Business) => &[Self::Delivered],
            (Self::Shipped, Role::Customer) => &[Self::Delivered],
            (
                Self::Pending | Self::Confirmed | Self::Processing | Self::Shipped,
                Role::Admin,
            ) => &[Self::Refunded],
            _ => &[],
        }
    }

    /// Consult the transition table for one `(from, actor) -> to` move
    pub fn can_transition(from: OrderStatus, role: Role, to: OrderStatus) -> bool {
        Self::destinations(from, role).contains(&to)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the seller hands goods to the buyer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    /// Buyer collects; no fee, no address
    Pickup,
    Standard,
    Express,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "PICKUP",
            Self::Standard => "STANDARD",
            Self::Express => "EXPRESS",
        }
    }

    /// Courier methods need somewhere to deliver to
    pub fn requires_address(&self) -> bool {
        !matches!(self, Self::Pickup)
    }
}

/// Order line snapshot, decoupled from later catalog edits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub item: ItemRef,
    /// Item name at checkout time
    pub name: String,
    /// Unit price in currency unit at checkout time
    pub unit_price: f64,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Checkout pricing figures, all in currency unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub subtotal: f64,
    pub delivery_fee: f64,
    /// Platform commission, rounded to the nearest whole currency unit
    pub commission: f64,
    pub total: f64,
}

impl PricingBreakdown {
    /// All-zero breakdown for an empty line set
    pub fn zero() -> Self {
        Self {
            subtotal: 0.0,
            delivery_fee: 0.0,
            commission: 0.0,
            total: 0.0,
        }
    }
}
