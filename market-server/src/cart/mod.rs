//! Cart Module
//!
//! One cart interface over two backends: signed-in buyers get lines
//! persisted in SurrealDB, anonymous buyers get the in-memory device cart.
//! Every line snapshots the catalog item at add time (name, unit price,
//! commission percent), and the seller always comes from the catalog row,
//! never from the request.
//!
//! Line identity is the hash of `(buyer, seller, item)`, so adding the same
//! item twice increments the existing line on either backend, and the
//! sign-in merge folds device lines into the persisted cart by the same
//! key.

pub mod guest;

use std::collections::HashMap;
use std::sync::Arc;

use shared::models::{CartLineView, ItemRef, MergeOutcome, SellerCart, line_key};
use shared::{ApiError, ApiResult};

use crate::auth::CartIdentity;
use crate::core::ServerState;
use crate::db::models::CartLine;
use crate::db::repository::{CartRepository, CatalogRepository};
use crate::pricing::money;
use crate::utils::time::now_millis;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text, validate_quantity};

pub use guest::GuestCartStore;

pub struct CartService {
    repo: CartRepository,
    catalog: CatalogRepository,
    guests: Arc<GuestCartStore>,
}

impl CartService {
    pub fn new(state: &ServerState) -> Self {
        Self {
            repo: CartRepository::new(state.db.clone()),
            catalog: CatalogRepository::new(state.db.clone()),
            guests: state.guest_carts.clone(),
        }
    }

    /// Add an item, or bump the quantity of the matching line
    pub async fn add_line(
        &self,
        who: &CartIdentity,
        kind: &str,
        item_id: &str,
        quantity: i32,
        note: Option<String>,
    ) -> ApiResult<CartLineView> {
        validate_quantity(quantity)?;
        validate_optional_text(&note, "Note", MAX_NOTE_LEN)?;
        let item = ItemRef::parse(kind, item_id)?;

        let catalog_item = self
            .catalog
            .find_by_key(item.item_id())
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Catalog item {}", item.item_id())))?;
        if !catalog_item.kind.matches(&item) {
            return Err(ApiError::invalid_line(format!(
                "Catalog item {} is a {}, not a {}",
                item.item_id(),
                catalog_item.kind.as_str(),
                item.kind_str()
            )));
        }
        if !catalog_item.available {
            return Err(ApiError::validation(format!(
                "Catalog item {} is currently unavailable",
                item.item_id()
            )));
        }

        let buyer = who.buyer_key();
        let key = line_key(buyer, &catalog_item.seller, &item);
        let now = now_millis();
        let line = CartLine {
            id: None,
            buyer: buyer.to_string(),
            seller: catalog_item.seller.clone(),
            item,
            name: catalog_item.name.clone(),
            unit_price: catalog_item.unit_price,
            commission_percent: catalog_item.commission_percent,
            quantity,
            note,
            created_at: now,
            updated_at: now,
        };

        let stored = match who {
            CartIdentity::User { .. } => self.repo.upsert_line(&key, line, quantity).await?,
            CartIdentity::Guest { device } => self.guests.upsert(device, &key, line, quantity),
        };
        Ok(stored.view())
    }

    /// Overwrite a line's quantity; zero or less removes the line
    ///
    /// Returns the updated view, or `None` when the line was removed.
    pub async fn set_quantity(
        &self,
        who: &CartIdentity,
        key: &str,
        quantity: i32,
    ) -> ApiResult<Option<CartLineView>> {
        if quantity <= 0 {
            self.remove_line(who, key).await?;
            return Ok(None);
        }
        validate_quantity(quantity)?;

        let now = now_millis();
        let updated = match who {
            CartIdentity::User { profile } => {
                self.repo.set_quantity(key, profile, quantity, now).await?
            }
            CartIdentity::Guest { device } => self.guests.set_quantity(device, key, quantity, now),
        };
        let line =
            updated.ok_or_else(|| ApiError::not_found(format!("Cart line {key}")))?;
        Ok(Some(line.view()))
    }

    /// Remove one line; removing an absent line succeeds
    pub async fn remove_line(&self, who: &CartIdentity, key: &str) -> ApiResult<()> {
        match who {
            CartIdentity::User { profile } => self.repo.remove(key, profile).await?,
            CartIdentity::Guest { device } => self.guests.remove(device, key),
        }
        Ok(())
    }

    /// The whole cart, grouped by seller with per-seller subtotals
    ///
    /// Sellers appear in the order their first line was added.
    pub async fn get_cart(&self, who: &CartIdentity) -> ApiResult<Vec<SellerCart>> {
        let lines = match who {
            CartIdentity::User { profile } => self.repo.list_for_buyer(profile).await?,
            CartIdentity::Guest { device } => self.guests.list(device),
        };
        Ok(Self::group_by_seller(lines))
    }

    /// One seller's slice of the cart, for checkout
    pub async fn seller_lines(
        &self,
        who: &CartIdentity,
        seller: &str,
    ) -> ApiResult<Vec<CartLineView>> {
        let lines = match who {
            CartIdentity::User { profile } => self.repo.lines_for_seller(profile, seller).await?,
            CartIdentity::Guest { device } => self.guests.lines_for_seller(device, seller),
        };
        Ok(lines.iter().map(CartLine::view).collect())
    }

    /// Clear the whole cart, or only one seller's lines
    pub async fn clear(&self, who: &CartIdentity, seller: Option<&str>) -> ApiResult<()> {
        match (who, seller) {
            (CartIdentity::User { profile }, Some(seller)) => {
                self.repo.clear_for_seller(profile, seller).await?
            }
            (CartIdentity::User { profile }, None) => self.repo.clear_for_buyer(profile).await?,
            (CartIdentity::Guest { device }, Some(seller)) => {
                self.guests.clear_seller(device, seller)
            }
            (CartIdentity::Guest { device }, None) => self.guests.clear(device),
        }
        Ok(())
    }

    /// Fold a device cart into the signed-in buyer's persisted cart
    ///
    /// Each device line is re-keyed under the profile, upserted (summing
    /// quantities with any existing line) and only then dropped from the
    /// device cart, so a failure mid-way leaves the remainder mergeable.
    /// Merging an empty device cart is a no-op, which makes the call
    /// idempotent.
    pub async fn merge(&self, device: &str, profile: &str) -> ApiResult<MergeOutcome> {
        if device.trim().is_empty() {
            return Err(ApiError::validation("Device id must not be empty"));
        }

        let mut merged = 0;
        for guest_line in self.guests.list(device) {
            let guest_key = line_key(device, &guest_line.seller, &guest_line.item);
            let key = line_key(profile, &guest_line.seller, &guest_line.item);
            let quantity = guest_line.quantity;
            let line = CartLine {
                id: None,
                buyer: profile.to_string(),
                updated_at: now_millis(),
                ..guest_line
            };
            self.repo.upsert_line(&key, line, quantity).await?;
            self.guests.remove(device, &guest_key);
            merged += 1;
        }

        if merged > 0 {
            tracing::info!(device = %device, profile = %profile, lines = merged, "Merged device cart");
        }
        Ok(MergeOutcome {
            merged_lines: merged,
        })
    }

    fn group_by_seller(lines: Vec<CartLine>) -> Vec<SellerCart> {
        let mut carts: Vec<SellerCart> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for line in &lines {
            let view = line.view();
            match index.get(&view.seller) {
                Some(&i) => carts[i].lines.push(view),
                None => {
                    index.insert(view.seller.clone(), carts.len());
                    carts.push(SellerCart {
                        seller: view.seller.clone(),
                        lines: vec![view],
                        subtotal: 0.0,
                    });
                }
            }
        }
        for cart in &mut carts {
            cart.subtotal = money::lines_subtotal(&cart.lines);
        }
        carts
    }
}
