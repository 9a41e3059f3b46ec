//! Order Repository
//!
//! Status moves go through [`OrderRepository::transition`]: one conditional
//! UPDATE gated on the expected current status. When the row was moved by a
//! concurrent request the update matches nothing and the caller gets `None`
//! back instead of a silently double-applied transition.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Order;
use shared::models::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "customer_order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn parse_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(id, TABLE)
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = Self::parse_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    pub async fn list_for_buyer(&self, buyer: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM customer_order WHERE buyer = $buyer ORDER BY created_at DESC")
            .bind(("buyer", buyer.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn list_for_seller(&self, seller: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM customer_order WHERE seller = $seller ORDER BY created_at DESC")
            .bind(("seller", seller.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Move an order from `from` to `to` if and only if it still sits at `from`
    ///
    /// Stamps the destination timestamp field in the same statement. `None`
    /// means the row no longer matched the expected status.
    pub async fn transition(
        &self,
        id: &RecordId,
        from: OrderStatus,
        to: OrderStatus,
        now: i64,
    ) -> RepoResult<Option<Order>> {
        // Destinations always carry a stamp field; only PENDING has none and
        // nothing transitions into PENDING.
        let query = match to.timestamp_field() {
            Some(field) => format!(
                "UPDATE $id SET status = $to, updated_at = $now, {field} = $now \
                 WHERE status = $from RETURN AFTER"
            ),
            None => "UPDATE $id SET status = $to, updated_at = $now \
                     WHERE status = $from RETURN AFTER"
                .to_string(),
        };
        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("id", id.clone()))
            .bind(("to", to))
            .bind(("from", from))
            .bind(("now", now))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Mark a delivered order as settled, once
    pub async fn settle(&self, id: &RecordId, now: i64) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET settled = true, settled_at = $now, updated_at = $now \
                 WHERE status = $status AND settled = false RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("status", OrderStatus::Delivered))
            .bind(("now", now))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Delivered orders of one seller, for the earnings scan
    pub async fn find_delivered_for_seller(&self, seller: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM customer_order WHERE seller = $seller AND status = $status")
            .bind(("seller", seller.to_string()))
            .bind(("status", OrderStatus::Delivered))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
