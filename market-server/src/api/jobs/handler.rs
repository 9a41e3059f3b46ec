//! Job API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::JobStatus;

use crate::auth::Actor;
use crate::core::ServerState;
use crate::db::models::{Job, JobCreate};
use crate::fulfillment::JobService;
use crate::utils::{ApiResponse, ApiResult, ok, ok_with_message};

/// POST /api/jobs/{id}/quote payload
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub price: f64,
}

/// POST /api/jobs/{id}/complete payload
#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    /// Defaults to the quoted price when absent
    #[serde(default)]
    pub final_price: Option<f64>,
}

/// POST /api/jobs - raise a job request
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<JobCreate>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    let job = JobService::new(&state).create(&actor, payload).await?;
    Ok(ok_with_message(job, "Job requested"))
}

/// GET /api/jobs - the caller's job book
pub async fn list(
    State(state): State<ServerState>,
    actor: Actor,
) -> ApiResult<Json<ApiResponse<Vec<Job>>>> {
    let jobs = JobService::new(&state).list(&actor).await?;
    Ok(ok(jobs))
}

/// GET /api/jobs/{id} - one job, parties only
pub async fn get_by_id(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    let job = JobService::new(&state).get(&actor, &id).await?;
    Ok(ok(job))
}

/// POST /api/jobs/{id}/quote - seller prices a fresh request
pub async fn quote(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(payload): Json<QuoteRequest>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    let job = JobService::new(&state)
        .quote(&actor, &id, payload.price)
        .await?;
    Ok(ok(job))
}

/// POST /api/jobs/{id}/complete - seller closes out ongoing work
pub async fn complete(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
    payload: Option<Json<CompleteRequest>>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    let final_price = payload.and_then(|Json(p)| p.final_price);
    let job = JobService::new(&state)
        .complete(&actor, &id, final_price)
        .await?;
    Ok(ok(job))
}

async fn transition(
    state: ServerState,
    actor: Actor,
    id: String,
    to: JobStatus,
) -> ApiResult<Json<ApiResponse<Job>>> {
    let job = JobService::new(&state).transition(&actor, &id, to).await?;
    Ok(ok(job))
}

/// POST /api/jobs/{id}/accept - buyer takes the quote
pub async fn accept(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    transition(state, actor, id, JobStatus::Accepted).await
}

/// POST /api/jobs/{id}/start - seller begins the work
pub async fn start(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    transition(state, actor, id, JobStatus::Ongoing).await
}

/// POST /api/jobs/{id}/reject - seller declines a fresh request
pub async fn reject(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    transition(state, actor, id, JobStatus::Rejected).await
}

/// POST /api/jobs/{id}/cancel - buyer backs out before work starts
pub async fn cancel(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    transition(state, actor, id, JobStatus::Cancelled).await
}

/// POST /api/jobs/{id}/dispute - admin freezes a live job
pub async fn dispute(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    transition(state, actor, id, JobStatus::Disputed).await
}

/// POST /api/jobs/{id}/settle - admin releases the payout hold
pub async fn settle(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Job>>> {
    let job = JobService::new(&state).settle(&actor, &id).await?;
    Ok(ok(job))
}
