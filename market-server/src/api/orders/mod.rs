//! Order API Module
//!
//! The order book plus one action route per lifecycle step. Who may take
//! which step is decided by the transition table in `shared`, not here;
//! these routes only name the destination.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        // Lifecycle actions
        .route("/{id}/confirm", post(handler::confirm))
        .route("/{id}/process", post(handler::process))
        .route("/{id}/ship", post(handler::ship))
        .route("/{id}/deliver", post(handler::deliver))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/refund", post(handler::refund))
        // Payout hold release
        .route("/{id}/settle", post(handler::settle))
}
