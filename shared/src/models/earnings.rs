//! Earnings Model
//!
//! Seller revenue views computed from terminal-complete transactions, plus
//! the withdrawal request lifecycle. Only the admin advances withdrawals.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Withdrawal request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Rejected,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// A request still counts against the seller's available balance here
    pub fn is_outstanding(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// Storage field stamped when a request arrives at this status
    pub fn timestamp_field(&self) -> Option<&'static str> {
        match self {
            Self::Pending => None,
            Self::Processing => Some("processing_at"),
            Self::Completed => Some("completed_at"),
            Self::Rejected => Some("rejected_at"),
        }
    }

    /// Destinations the given role may move a request to from `from`
    pub fn destinations(from: WithdrawalStatus, role: Role) -> &'static [WithdrawalStatus] {
        if role != Role::Admin {
            return &[];
        }
        match from {
            Self::Pending => &[Self::Processing, Self::Rejected],
            Self::Processing => &[Self::Completed, Self::Rejected],
            Self::Completed | Self::Rejected => &[],
        }
    }

    /// Consult the transition table for one `(from, actor) -> to` move
    pub fn can_transition(from: WithdrawalStatus, role: Role, to: WithdrawalStatus) -> bool {
        Self::destinations(from, role).contains(&to)
    }
}

impl std::fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seller payout destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

/// Seller earnings snapshot, all amounts in currency unit
///
/// Computed on demand by scanning delivered orders and completed jobs;
/// nothing here is stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarningsSnapshot {
    /// Sum of transaction totals
    pub gross_revenue: f64,
    /// Sum of platform commission over the same transactions
    pub total_commission: f64,
    /// gross_revenue - total_commission
    pub net_revenue: f64,
    /// Net amounts whose hold period has cleared
    pub available_balance: f64,
    /// Net amounts still inside the hold period
    pub pending_balance: f64,
}

impl EarningsSnapshot {
    pub fn zero() -> Self {
        Self {
            gross_revenue: 0.0,
            total_commission: 0.0,
            net_revenue: 0.0,
            available_balance: 0.0,
            pending_balance: 0.0,
        }
    }
}
