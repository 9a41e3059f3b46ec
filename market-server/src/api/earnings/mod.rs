//! Earnings API Module
//!
//! Seller money routes: the computed earnings snapshot and the withdrawal
//! lifecycle. Sellers create and watch their requests; the decision routes
//! are admin-only by way of the withdrawal transition table.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Earnings router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/earnings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::earnings))
        .route(
            "/withdrawals",
            get(handler::list_withdrawals).post(handler::request_withdrawal),
        )
        .route("/withdrawals/{id}", get(handler::get_withdrawal))
        // Admin decisions
        .route("/withdrawals/{id}/process", post(handler::process))
        .route("/withdrawals/{id}/complete", post(handler::complete))
        .route("/withdrawals/{id}/reject", post(handler::reject))
}
