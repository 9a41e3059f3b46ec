//! Cart Model
//!
//! A cart line references exactly one catalog item, either a product or a
//! service. The variant is closed so a "neither" line is unrepresentable in
//! memory; loose input is rejected at the API boundary via [`ItemRef::parse`].

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Reference to the catalog item a cart line sells
///
/// The payload is the catalog record key (without table prefix).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemRef {
    /// Physical good, fulfilled through the order lifecycle
    Product(String),
    /// Work performed, fulfilled through the job lifecycle
    Service(String),
}

impl ItemRef {
    /// Parse a loose `(kind, id)` pair from the API boundary
    ///
    /// Anything that is not exactly one product or one service reference is
    /// rejected here, before it can reach the cart store.
    pub fn parse(kind: &str, id: &str) -> ApiResult<Self> {
        if id.trim().is_empty() {
            return Err(ApiError::invalid_line(
                "Cart line item id must not be empty; supply the catalog item id",
            ));
        }
        match kind.to_ascii_uppercase().as_str() {
            "PRODUCT" => Ok(Self::Product(id.to_string())),
            "SERVICE" => Ok(Self::Service(id.to_string())),
            other => Err(ApiError::invalid_line(format!(
                "Cart line kind must be PRODUCT or SERVICE, got '{}'",
                other
            ))),
        }
    }

    /// Catalog record key of the referenced item
    pub fn item_id(&self) -> &str {
        match self {
            Self::Product(id) | Self::Service(id) => id,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Product(_) => "PRODUCT",
            Self::Service(_) => "SERVICE",
        }
    }

    pub fn is_product(&self) -> bool {
        matches!(self, Self::Product(_))
    }

    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

/// Deterministic cart line key for the `(buyer, seller, item)` dedupe tuple
///
/// The key doubles as the storage record key, so add-or-increment can target
/// the record directly without a lookup. Two adds of the same item by the
/// same buyer always land on the same record.
pub fn line_key(buyer: &str, seller: &str, item: &ItemRef) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for part in [buyer, seller, item.kind_str(), item.item_id()] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }

    let result = hasher.finalize();
    hex::encode(&result[..16]) // Use first 16 bytes for shorter ID
}

/// Cart line as returned to clients, identical over both cart backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    /// Line key of the `(buyer, seller, item)` tuple, stable across adds
    pub id: String,
    /// Business profile ID of the seller
    pub seller: String,
    pub item: ItemRef,
    /// Item name snapshotted at add time
    pub name: String,
    /// Unit price in currency unit, snapshotted at add time
    pub unit_price: f64,
    /// Per-item commission percent, snapshotted at add time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_percent: Option<f64>,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One seller's slice of a buyer's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerCart {
    /// Business profile ID
    pub seller: String,
    pub lines: Vec<CartLineView>,
    /// Sum of unit price x quantity over the lines, in currency unit
    pub subtotal: f64,
}

/// Result of folding a device-local cart into a profile cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// Lines folded into the persisted cart during this call
    pub merged_lines: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_product_and_service() {
        assert_eq!(
            ItemRef::parse("PRODUCT", "p1").unwrap(),
            ItemRef::Product("p1".to_string())
        );
        assert_eq!(
            ItemRef::parse("service", "s1").unwrap(),
            ItemRef::Service("s1".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let err = ItemRef::parse("BUNDLE", "x").unwrap_err();
        assert!(err.message().contains("PRODUCT or SERVICE"));
    }

    #[test]
    fn test_parse_rejects_empty_id() {
        assert!(ItemRef::parse("PRODUCT", "  ").is_err());
    }

    #[test]
    fn test_line_key_is_stable_per_tuple() {
        let item = ItemRef::Product("p1".to_string());
        let a = line_key("buyer1", "seller1", &item);
        let b = line_key("buyer1", "seller1", &ItemRef::Product("p1".to_string()));
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_line_key_separates_kind_and_parties() {
        let product = ItemRef::Product("x1".to_string());
        let service = ItemRef::Service("x1".to_string());
        let base = line_key("b", "s", &product);
        assert_ne!(base, line_key("b", "s", &service));
        assert_ne!(base, line_key("b2", "s", &product));
        assert_ne!(base, line_key("b", "s2", &product));
    }

    #[test]
    fn test_item_ref_serde_shape() {
        let item = ItemRef::Service("svc9".to_string());
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"kind":"SERVICE","id":"svc9"}"#);
        let back: ItemRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
