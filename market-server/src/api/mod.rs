//! API Route Modules
//!
//! # Structure
//!
//! - [`health`] - liveness and component checks
//! - [`cart`] - cart lines, grouped views, guest merge
//! - [`checkout`] - pricing preview and order placement
//! - [`orders`] - order book and lifecycle actions
//! - [`jobs`] - service requests and their lifecycle
//! - [`earnings`] - seller balances and withdrawals
//!
//! Each feature module exposes a `router()` already nested under its
//! `/api/...` prefix; [`crate::routes::build_router`] merges them.

pub mod cart;
pub mod checkout;
pub mod earnings;
pub mod health;
pub mod jobs;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, ApiResult};
