//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{CartLineView, MergeOutcome, SellerCart};
use shared::response::Empty;

use crate::auth::{Actor, CartIdentity};
use crate::cart::CartService;
use crate::core::ServerState;
use crate::utils::{ApiResponse, ApiResult, ok, ok_with_message};

/// POST /api/cart/lines payload
#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    /// PRODUCT or SERVICE
    pub kind: String,
    /// Catalog record key
    pub id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

/// PATCH /api/cart/lines/{key} payload
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    /// Zero or below removes the line
    pub quantity: i32,
}

/// DELETE /api/cart query
#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    /// Restrict the clear to one seller's lines
    #[serde(default)]
    pub seller: Option<String>,
}

/// POST /api/cart/merge payload
#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    /// Device whose anonymous cart folds into the caller's
    pub device_id: String,
}

/// GET /api/cart - the cart grouped by seller
pub async fn get_cart(
    State(state): State<ServerState>,
    who: CartIdentity,
) -> ApiResult<Json<ApiResponse<Vec<SellerCart>>>> {
    let cart = CartService::new(&state).get_cart(&who).await?;
    Ok(ok(cart))
}

/// POST /api/cart/lines - add an item or bump the matching line
pub async fn add_line(
    State(state): State<ServerState>,
    who: CartIdentity,
    Json(payload): Json<AddLineRequest>,
) -> ApiResult<Json<ApiResponse<CartLineView>>> {
    let line = CartService::new(&state)
        .add_line(&who, &payload.kind, &payload.id, payload.quantity, payload.note)
        .await?;
    Ok(ok(line))
}

/// PATCH /api/cart/lines/{key} - set a line's quantity
pub async fn set_quantity(
    State(state): State<ServerState>,
    who: CartIdentity,
    Path(key): Path<String>,
    Json(payload): Json<SetQuantityRequest>,
) -> ApiResult<Json<ApiResponse<Option<CartLineView>>>> {
    let line = CartService::new(&state)
        .set_quantity(&who, &key, payload.quantity)
        .await?;
    match line {
        Some(line) => Ok(ok(Some(line))),
        None => Ok(ok_with_message(None, "Line removed")),
    }
}

/// DELETE /api/cart/lines/{key} - drop a line
pub async fn remove_line(
    State(state): State<ServerState>,
    who: CartIdentity,
    Path(key): Path<String>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    CartService::new(&state).remove_line(&who, &key).await?;
    Ok(ok_with_message(Empty, "Line removed"))
}

/// DELETE /api/cart - clear the cart, or one seller's slice of it
pub async fn clear(
    State(state): State<ServerState>,
    who: CartIdentity,
    Query(query): Query<ClearQuery>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    CartService::new(&state)
        .clear(&who, query.seller.as_deref())
        .await?;
    Ok(ok_with_message(Empty, "Cart cleared"))
}

/// POST /api/cart/merge - fold a device cart into the signed-in buyer's
pub async fn merge(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<MergeRequest>,
) -> ApiResult<Json<ApiResponse<MergeOutcome>>> {
    let outcome = CartService::new(&state)
        .merge(&payload.device_id, &actor.profile_id)
        .await?;
    Ok(ok(outcome))
}
