//! Cart Repository
//!
//! The record key of every line is the hash of `(buyer, seller, item)`, so
//! add-or-increment is a single UPSERT against a known record id. Two
//! concurrent adds of the same item land on the same record and both
//! increments survive.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::CartLine;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "cart_line";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn record(key: &str) -> RecordId {
        RecordId::from_table_key(TABLE, key)
    }

    /// Add-or-increment as one atomic statement
    ///
    /// A fresh key inserts the line; an existing key bumps the quantity and
    /// refreshes the catalog snapshot to the values passed in. An incoming
    /// note replaces the stored one only when present.
    pub async fn upsert_line(&self, key: &str, line: CartLine, delta: i32) -> RepoResult<CartLine> {
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT $id SET \
                     buyer = $buyer, \
                     seller = $seller, \
                     item = $item, \
                     name = $name, \
                     unit_price = $unit_price, \
                     commission_percent = $commission_percent, \
                     quantity = (quantity OR 0) + $delta, \
                     note = $note OR note, \
                     created_at = created_at OR $now, \
                     updated_at = $now \
                 RETURN AFTER",
            )
            .bind(("id", Self::record(key)))
            .bind(("buyer", line.buyer))
            .bind(("seller", line.seller))
            .bind(("item", line.item))
            .bind(("name", line.name))
            .bind(("unit_price", line.unit_price))
            .bind(("commission_percent", line.commission_percent))
            .bind(("delta", delta))
            .bind(("note", line.note))
            .bind(("now", line.updated_at))
            .await?;
        let lines: Vec<CartLine> = result.take(0)?;
        lines
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to upsert cart line".to_string()))
    }

    /// Overwrite the quantity of an existing line
    ///
    /// Gated on the owning buyer; `None` when the line does not exist or
    /// belongs to someone else. Callers remove the line instead of calling
    /// this with a quantity of zero or less.
    pub async fn set_quantity(
        &self,
        key: &str,
        buyer: &str,
        quantity: i32,
        now: i64,
    ) -> RepoResult<Option<CartLine>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET quantity = $quantity, updated_at = $now \
                 WHERE buyer = $buyer RETURN AFTER",
            )
            .bind(("id", Self::record(key)))
            .bind(("buyer", buyer.to_string()))
            .bind(("quantity", quantity))
            .bind(("now", now))
            .await?;
        let lines: Vec<CartLine> = result.take(0)?;
        Ok(lines.into_iter().next())
    }

    /// Remove one line of the owning buyer; absent lines are a no-op
    pub async fn remove(&self, key: &str, buyer: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE $id WHERE buyer = $buyer")
            .bind(("id", Self::record(key)))
            .bind(("buyer", buyer.to_string()))
            .await?;
        Ok(())
    }

    /// All lines of one buyer, oldest first
    pub async fn list_for_buyer(&self, buyer: &str) -> RepoResult<Vec<CartLine>> {
        let lines: Vec<CartLine> = self
            .base
            .db()
            .query("SELECT * FROM cart_line WHERE buyer = $buyer ORDER BY created_at")
            .bind(("buyer", buyer.to_string()))
            .await?
            .take(0)?;
        Ok(lines)
    }

    /// One buyer's lines for one seller, oldest first
    pub async fn lines_for_seller(&self, buyer: &str, seller: &str) -> RepoResult<Vec<CartLine>> {
        let lines: Vec<CartLine> = self
            .base
            .db()
            .query(
                "SELECT * FROM cart_line WHERE buyer = $buyer AND seller = $seller \
                 ORDER BY created_at",
            )
            .bind(("buyer", buyer.to_string()))
            .bind(("seller", seller.to_string()))
            .await?
            .take(0)?;
        Ok(lines)
    }

    /// Drop every line of one buyer
    pub async fn clear_for_buyer(&self, buyer: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_line WHERE buyer = $buyer")
            .bind(("buyer", buyer.to_string()))
            .await?;
        Ok(())
    }

    /// Drop one buyer's lines for one seller, leaving other sellers untouched
    pub async fn clear_for_seller(&self, buyer: &str, seller: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_line WHERE buyer = $buyer AND seller = $seller")
            .bind(("buyer", buyer.to_string()))
            .bind(("seller", seller.to_string()))
            .await?;
        Ok(())
    }
}
