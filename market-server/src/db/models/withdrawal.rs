//! Withdrawal Request Entity

use serde::{Deserialize, Serialize};
use shared::models::{BankDetails, WithdrawalStatus};
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Business profile ID
    pub seller: String,
    /// Requested amount in currency unit
    pub amount: f64,
    pub bank: BankDetails,
    #[serde(default)]
    pub status: WithdrawalStatus,
    /// Admin note, usually a rejection reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<i64>,
}

impl WithdrawalRequest {
    /// `table:key` form used in API paths and responses
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}
