//! Guest Cart Store
//!
//! Device-local carts for anonymous buyers, held in memory and keyed by
//! device id. Lines use the same entity shape and the same dedupe key as
//! persisted carts, so the merge after sign-in is a straight fold.
//!
//! Each mutation happens under one DashMap entry guard, which gives
//! add-or-increment the same all-or-nothing behaviour the UPSERT gives the
//! persisted backend.

use std::collections::HashMap;

use dashmap::DashMap;

use crate::db::models::CartLine;

/// In-memory cart lines per device, line key -> line
type DeviceCart = HashMap<String, CartLine>;

#[derive(Debug, Default)]
pub struct GuestCartStore {
    carts: DashMap<String, DeviceCart>,
}

impl GuestCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add-or-increment under the device's entry guard
    pub fn upsert(&self, device: &str, key: &str, line: CartLine, delta: i32) -> CartLine {
        let mut cart = self.carts.entry(device.to_string()).or_default();
        let entry = cart
            .entry(key.to_string())
            .and_modify(|existing| {
                existing.quantity += delta;
                // Latest catalog snapshot wins, same as the persisted backend
                existing.name = line.name.clone();
                existing.unit_price = line.unit_price;
                existing.commission_percent = line.commission_percent;
                if line.note.is_some() {
                    existing.note = line.note.clone();
                }
                existing.updated_at = line.updated_at;
            })
            .or_insert_with(|| CartLine {
                quantity: delta,
                ..line
            });
        entry.clone()
    }

    /// Overwrite the quantity of an existing line; `None` when absent
    pub fn set_quantity(
        &self,
        device: &str,
        key: &str,
        quantity: i32,
        now: i64,
    ) -> Option<CartLine> {
        let mut cart = self.carts.get_mut(device)?;
        let line = cart.get_mut(key)?;
        line.quantity = quantity;
        line.updated_at = now;
        Some(line.clone())
    }

    /// Remove one line; absent lines are a no-op
    pub fn remove(&self, device: &str, key: &str) {
        if let Some(mut cart) = self.carts.get_mut(device) {
            cart.remove(key);
            if cart.is_empty() {
                drop(cart);
                self.carts.remove_if(device, |_, cart| cart.is_empty());
            }
        }
    }

    /// All lines of one device, oldest first
    pub fn list(&self, device: &str) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = self
            .carts
            .get(device)
            .map(|cart| cart.values().cloned().collect())
            .unwrap_or_default();
        lines.sort_by_key(|line| line.created_at);
        lines
    }

    /// One device's lines for one seller, oldest first
    pub fn lines_for_seller(&self, device: &str, seller: &str) -> Vec<CartLine> {
        let mut lines = self.list(device);
        lines.retain(|line| line.seller == seller);
        lines
    }

    /// Drop every line of one device
    pub fn clear(&self, device: &str) {
        self.carts.remove(device);
    }

    /// Drop one device's lines for one seller
    pub fn clear_seller(&self, device: &str, seller: &str) {
        if let Some(mut cart) = self.carts.get_mut(device) {
            cart.retain(|_, line| line.seller != seller);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ItemRef, line_key};

    fn make_line(device: &str, seller: &str, item_id: &str, quantity: i32) -> (String, CartLine) {
        let item = ItemRef::Product(item_id.to_string());
        let key = line_key(device, seller, &item);
        let line = CartLine {
            id: None,
            buyer: device.to_string(),
            seller: seller.to_string(),
            item,
            name: format!("Item {item_id}"),
            unit_price: 500.0,
            commission_percent: Some(10.0),
            quantity,
            note: None,
            created_at: 1_000,
            updated_at: 1_000,
        };
        (key, line)
    }

    #[test]
    fn test_upsert_increments_same_tuple() {
        let store = GuestCartStore::new();
        let (key, line) = make_line("dev1", "seller1", "p1", 2);

        let first = store.upsert("dev1", &key, line.clone(), 2);
        assert_eq!(first.quantity, 2);

        let second = store.upsert("dev1", &key, line, 3);
        assert_eq!(second.quantity, 5);
        assert_eq!(store.list("dev1").len(), 1);
    }

    #[test]
    fn test_set_quantity_on_missing_line() {
        let store = GuestCartStore::new();
        assert!(store.set_quantity("dev1", "nope", 4, 2_000).is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = GuestCartStore::new();
        let (key, line) = make_line("dev1", "seller1", "p1", 1);
        store.upsert("dev1", &key, line, 1);

        store.remove("dev1", &key);
        store.remove("dev1", &key);
        assert!(store.list("dev1").is_empty());
    }

    #[test]
    fn test_clear_seller_leaves_other_sellers() {
        let store = GuestCartStore::new();
        let (key_a, line_a) = make_line("dev1", "seller_a", "p1", 1);
        let (key_b, line_b) = make_line("dev1", "seller_b", "p2", 1);
        store.upsert("dev1", &key_a, line_a, 1);
        store.upsert("dev1", &key_b, line_b, 1);

        store.clear_seller("dev1", "seller_a");

        let remaining = store.list("dev1");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].seller, "seller_b");
    }
}
