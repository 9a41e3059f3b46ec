//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::OrderStatus;

use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::fulfillment::OrderService;
use crate::utils::{ApiResponse, ApiResult, ok};

/// GET /api/orders - the caller's order book
pub async fn list(
    State(state): State<ServerState>,
    actor: Actor,
) -> ApiResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = OrderService::new(&state).list(&actor).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id} - one order, parties only
pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    let order = OrderService::new(&state).get(&actor, &id).await?;
    Ok(ok(order))
}

async fn transition(
    state: ServerState,
    actor: Actor,
    id: String,
    to: OrderStatus,
) -> ApiResult<Json<ApiResponse<Order>>> {
    let order = OrderService::new(&state).transition(&actor, &id, to).await?;
    Ok(ok(order))
}

/// POST /api/orders/{id}/confirm - seller accepts the order
pub async fn confirm(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    transition(state, actor, id, OrderStatus::Confirmed).await
}

/// POST /api/orders/{id}/process - seller starts preparing
pub async fn process(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    transition(state, actor, id, OrderStatus::Processing).await
}

/// POST /api/orders/{id}/ship - seller hands over to delivery
pub async fn ship(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    transition(state, actor, id, OrderStatus::Shipped).await
}

/// POST /api/orders/{id}/deliver - buyer confirms receipt
pub async fn deliver(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    transition(state, actor, id, OrderStatus::Delivered).await
}

/// POST /api/orders/{id}/cancel - either side backs out early
pub async fn cancel(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    transition(state, actor, id, OrderStatus::Cancelled).await
}

/// POST /api/orders/{id}/refund - admin refunds a live order
pub async fn refund(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    transition(state, actor, id, OrderStatus::Refunded).await
}

/// POST /api/orders/{id}/settle - admin releases the payout hold
pub async fn settle(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    let order = OrderService::new(&state).settle(&actor, &id).await?;
    Ok(ok(order))
}
