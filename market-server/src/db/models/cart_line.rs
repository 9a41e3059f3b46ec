//! Cart Line Entity

use serde::{Deserialize, Serialize};
use shared::models::{CartLineView, ItemRef, line_key};
use surrealdb::RecordId;

use super::serde_helpers;

/// Persisted cart line
///
/// The record key is [`line_key`] of `(buyer, seller, item)`, so the dedupe
/// tuple and the storage identity are the same thing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Customer profile ID
    pub buyer: String,
    /// Business profile ID
    pub seller: String,
    pub item: ItemRef,
    /// Catalog snapshot: item name at add time
    pub name: String,
    /// Catalog snapshot: unit price in currency unit at add time
    pub unit_price: f64,
    /// Catalog snapshot: per-item commission percent at add time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_percent: Option<f64>,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CartLine {
    /// Client-facing view, uniform over both cart backends
    ///
    /// The view id is always the bare line key: persisted lines read it off
    /// the record id, device-local lines recompute it.
    pub fn view(&self) -> CartLineView {
        let id = self
            .id
            .as_ref()
            .map(|id| id.key().to_string())
            .unwrap_or_else(|| line_key(&self.buyer, &self.seller, &self.item));
        CartLineView {
            id,
            seller: self.seller.clone(),
            item: self.item.clone(),
            name: self.name.clone(),
            unit_price: self.unit_price,
            commission_percent: self.commission_percent,
            quantity: self.quantity,
            note: self.note.clone(),
        }
    }
}
