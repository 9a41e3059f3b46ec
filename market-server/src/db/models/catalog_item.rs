//! Catalog Item Entity
//!
//! Read model of the catalog collaborator. Authoring lives outside this
//! core; the cart only reads one row per add-to-cart to snapshot
//! name, price, commission percent and availability.

use serde::{Deserialize, Serialize};
use shared::models::ItemRef;
use surrealdb::RecordId;

use super::serde_helpers;

/// Catalog item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Product,
    Service,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "PRODUCT",
            Self::Service => "SERVICE",
        }
    }

    /// Whether a cart item reference targets this kind
    pub fn matches(&self, item: &ItemRef) -> bool {
        match self {
            Self::Product => item.is_product(),
            Self::Service => item.is_service(),
        }
    }
}

/// Catalog item row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub kind: ItemKind,
    /// Business profile ID of the owning seller
    pub seller: String,
    pub name: String,
    /// Unit price in currency unit
    pub unit_price: f64,
    /// Per-item commission percent; the pricing default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_percent: Option<f64>,
    #[serde(default = "default_true")]
    pub available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

impl CatalogItem {
    /// Bare record key, as referenced by cart lines and jobs
    pub fn record_key(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.key().to_string())
    }
}
