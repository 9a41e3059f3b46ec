//! Order Fulfilment
//!
//! Single entry point for every order status move. The caller names only
//! the destination; the expected source is whatever the order holds when
//! the request reads it, and the storage update re-checks that source so
//! racing requests cannot both apply.

use shared::models::{OrderStatus, Role};
use shared::{ApiError, ApiResult};

use super::party_for;
use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::utils::time::now_millis;

pub struct OrderService {
    repo: OrderRepository,
}

impl OrderService {
    pub fn new(state: &ServerState) -> Self {
        Self {
            repo: OrderRepository::new(state.db.clone()),
        }
    }

    /// Fetch one order; only its parties (and admins) may see it
    pub async fn get(&self, actor: &Actor, id: &str) -> ApiResult<Order> {
        let order = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Order {id}")))?;
        party_for(actor, &order.buyer, &order.seller)?;
        Ok(order)
    }

    /// The caller's order book: buyers see purchases, sellers see sales
    pub async fn list(&self, actor: &Actor) -> ApiResult<Vec<Order>> {
        match actor.role {
            Role::Business => Ok(self.repo.list_for_seller(&actor.profile_id).await?),
            Role::Customer => Ok(self.repo.list_for_buyer(&actor.profile_id).await?),
            Role::Admin => Err(ApiError::forbidden(
                "Admins look up orders by id, not by list",
            )),
        }
    }

    /// Move an order to `to`, if the table allows it for this caller
    pub async fn transition(&self, actor: &Actor, id: &str, to: OrderStatus) -> ApiResult<Order> {
        let order = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Order {id}")))?;
        let party = party_for(actor, &order.buyer, &order.seller)?;

        let from = order.status;
        if !OrderStatus::can_transition(from, party, to) {
            return Err(ApiError::invalid_transition(format!(
                "Cannot move order from {from} to {to} as {party}"
            )));
        }

        let record = order
            .id
            .clone()
            .ok_or_else(|| ApiError::internal("Order record has no id"))?;
        match self.repo.transition(&record, from, to, now_millis()).await? {
            Some(updated) => {
                tracing::info!(order = %id, from = %from, to = %to, party = %party, "Order transition");
                Ok(updated)
            }
            None => Err(ApiError::stale_transition(format!(
                "Order {id} changed status while this request ran"
            ))),
        }
    }

    /// Release a delivered order's funds into the seller's available balance
    pub async fn settle(&self, actor: &Actor, id: &str) -> ApiResult<Order> {
        actor.require_admin()?;
        let order = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Order {id}")))?;
        if order.status != OrderStatus::Delivered {
            return Err(ApiError::invalid_transition(format!(
                "Only delivered orders settle; order {id} is {}",
                order.status
            )));
        }
        if order.settled {
            return Err(ApiError::validation(format!(
                "Order {id} is already settled"
            )));
        }

        let record = order
            .id
            .clone()
            .ok_or_else(|| ApiError::internal("Order record has no id"))?;
        match self.repo.settle(&record, now_millis()).await? {
            Some(updated) => Ok(updated),
            None => Err(ApiError::stale_transition(format!(
                "Order {id} changed while this request ran"
            ))),
        }
    }
}
