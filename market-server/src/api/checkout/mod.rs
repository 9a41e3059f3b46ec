//! Checkout API Module
//!
//! Two endpoints: a side-effect-free preview open to guests, and the real
//! checkout which charges the buyer and places one order for one seller.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Checkout router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/checkout", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::checkout))
        .route("/preview", post(handler::preview))
}
