//! Checkout API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::models::{DeliveryMethod, PricingBreakdown};

use crate::auth::{Actor, CartIdentity};
use crate::checkout::CheckoutService;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::utils::{ApiResponse, ApiResult, ok, ok_with_message};

/// POST /api/checkout/preview payload
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub seller: String,
    pub delivery_method: DeliveryMethod,
}

/// POST /api/checkout payload
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub seller: String,
    pub delivery_method: DeliveryMethod,
    /// Required for courier methods, ignored for pickup
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// POST /api/checkout/preview - price a seller's slice without committing
pub async fn preview(
    State(state): State<ServerState>,
    who: CartIdentity,
    Json(payload): Json<PreviewRequest>,
) -> ApiResult<Json<ApiResponse<PricingBreakdown>>> {
    let pricing = CheckoutService::new(&state)
        .preview(&who, &payload.seller, payload.delivery_method)
        .await?;
    Ok(ok(pricing))
}

/// POST /api/checkout - charge the buyer and place one order for one seller
pub async fn checkout(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<CheckoutRequest>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    let order = CheckoutService::new(&state)
        .checkout(
            &actor,
            &payload.seller,
            payload.delivery_method,
            payload.delivery_address,
            payload.note,
        )
        .await?;
    Ok(ok_with_message(order, "Order placed"))
}
