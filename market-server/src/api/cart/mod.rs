//! Cart API Module
//!
//! Works for signed-in buyers and anonymous devices alike: the
//! [`crate::auth::CartIdentity`] extractor decides which backend a request
//! hits. Only the merge endpoint insists on a signed-in caller.

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

/// Cart router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Grouped cart view
        .route("/", get(handler::get_cart).delete(handler::clear))
        // Line operations
        .route("/lines", post(handler::add_line))
        .route(
            "/lines/{key}",
            delete(handler::remove_line).patch(handler::set_quantity),
        )
        // One-shot device merge after sign-in
        .route("/merge", post(handler::merge))
}
