//! Job API Module
//!
//! Service requests and their lifecycle. Quote and complete carry payloads
//! (they move price fields); the remaining actions only name a destination
//! and lean on the transition table.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Job router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/jobs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        // Price-moving actions
        .route("/{id}/quote", post(handler::quote))
        .route("/{id}/complete", post(handler::complete))
        // Plain lifecycle actions
        .route("/{id}/accept", post(handler::accept))
        .route("/{id}/start", post(handler::start))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/dispute", post(handler::dispute))
        // Payout hold release
        .route("/{id}/settle", post(handler::settle))
}
