//! Earnings API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{BankDetails, EarningsSnapshot, WithdrawalStatus};

use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::WithdrawalRequest;
use crate::earnings::EarningsService;
use crate::utils::{ApiResponse, ApiResult, ok, ok_with_message};

/// POST /api/earnings/withdrawals payload
#[derive(Debug, Deserialize)]
pub struct WithdrawalCreate {
    /// Amount in currency unit
    pub amount: f64,
    pub bank: BankDetails,
}

/// Optional payload for the admin decision routes
#[derive(Debug, Default, Deserialize)]
pub struct DecisionRequest {
    /// Kept on the request, usually a rejection reason
    #[serde(default)]
    pub note: Option<String>,
}

/// GET /api/earnings - the seller's computed snapshot
pub async fn earnings(
    State(state): State<ServerState>,
    actor: Actor,
) -> ApiResult<Json<ApiResponse<EarningsSnapshot>>> {
    let snapshot = EarningsService::new(&state).earnings(&actor).await?;
    Ok(ok(snapshot))
}

/// GET /api/earnings/withdrawals - own history, or the admin queue
pub async fn list_withdrawals(
    State(state): State<ServerState>,
    actor: Actor,
) -> ApiResult<Json<ApiResponse<Vec<WithdrawalRequest>>>> {
    let requests = EarningsService::new(&state).list_withdrawals(&actor).await?;
    Ok(ok(requests))
}

/// POST /api/earnings/withdrawals - ask for a payout
pub async fn request_withdrawal(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<WithdrawalCreate>,
) -> ApiResult<Json<ApiResponse<WithdrawalRequest>>> {
    let request = EarningsService::new(&state)
        .request_withdrawal(&actor, payload.amount, payload.bank)
        .await?;
    Ok(ok_with_message(request, "Withdrawal requested"))
}

/// GET /api/earnings/withdrawals/{id} - one request, owner or admin
pub async fn get_withdrawal(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<WithdrawalRequest>>> {
    let request = EarningsService::new(&state).get_withdrawal(&actor, &id).await?;
    Ok(ok(request))
}

async fn advance(
    state: ServerState,
    actor: Actor,
    id: String,
    to: WithdrawalStatus,
    payload: Option<Json<DecisionRequest>>,
) -> ApiResult<Json<ApiResponse<WithdrawalRequest>>> {
    let note = payload.and_then(|Json(p)| p.note);
    let request = EarningsService::new(&state)
        .advance(&actor, &id, to, note)
        .await?;
    Ok(ok(request))
}

/// POST /api/earnings/withdrawals/{id}/process - admin starts the payout
pub async fn process(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    payload: Option<Json<DecisionRequest>>,
) -> ApiResult<Json<ApiResponse<WithdrawalRequest>>> {
    advance(state, actor, id, WithdrawalStatus::Processing, payload).await
}

/// POST /api/earnings/withdrawals/{id}/complete - admin confirms the transfer
pub async fn complete(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    payload: Option<Json<DecisionRequest>>,
) -> ApiResult<Json<ApiResponse<WithdrawalRequest>>> {
    advance(state, actor, id, WithdrawalStatus::Completed, payload).await
}

/// POST /api/earnings/withdrawals/{id}/reject - admin declines the request
pub async fn reject(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    payload: Option<Json<DecisionRequest>>,
) -> ApiResult<Json<ApiResponse<WithdrawalRequest>>> {
    advance(state, actor, id, WithdrawalStatus::Rejected, payload).await
}
