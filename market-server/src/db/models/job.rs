//! Job Entity
//!
//! One row per service request. The commission percent is snapshotted from
//! the catalog at request time; the commission amount is only computed once
//! the job completes and a final price exists.

use serde::{Deserialize, Serialize};
use shared::models::{BudgetRange, JobStatus};
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Customer profile ID
    pub buyer: String,
    /// Business profile ID
    pub seller: String,
    /// Catalog service record key this request was raised against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub budget: BudgetRange,
    /// Commission percent snapshotted at request time
    pub commission_percent: f64,
    /// Seller's quote in currency unit; settable only while REQUESTED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_price: Option<f64>,
    /// Agreed price at completion, in currency unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
    /// Platform commission in whole currency units, set at completion
    #[serde(default)]
    pub commission: f64,
    #[serde(default)]
    pub status: JobStatus,
    /// Whether the completed amount has cleared the payout hold
    #[serde(default)]
    pub settled: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disputed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<i64>,
}

impl Job {
    /// `table:key` form used in API paths and responses
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// Seller take for a completed job, in currency unit
    pub fn net_amount(&self) -> f64 {
        self.final_price.unwrap_or(0.0) - self.commission
    }
}

/// Create job request payload
///
/// Either `service` (a catalog service key, from which the seller is
/// derived) or `seller` must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreate {
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    pub budget_min: f64,
    pub budget_max: f64,
}
