//! Marketplace transaction core
//!
//! Server-side engine for a two-sided marketplace: businesses sell products
//! and services, customers buy them. This crate owns the transactional
//! heart of the platform:
//!
//! - **Cart** (`cart`): device-local and persisted carts behind one interface
//! - **Pricing** (`pricing`): subtotal, delivery fee, commission, total
//! - **Checkout** (`checkout`): one seller's cart lines become one order
//! - **Fulfilment** (`fulfillment`): order and job status machines
//! - **Earnings** (`earnings`): revenue aggregation and withdrawals
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **HTTP API** (`api`): RESTful interface over axum
//!
//! Identity, catalog authoring, payment processing and administration live
//! outside this crate and are reached through narrow seams (`auth`,
//! `db::repository::catalog`, `services::payment`).

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod core;
pub mod db;
pub mod earnings;
pub mod fulfillment;
pub mod pricing;
pub mod routes;
pub mod server;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{Actor, CartIdentity};
pub use core::{Config, ServerState};
pub use server::Server;
pub use services::{AutoApprovePayments, PaymentGateway, PaymentOutcome};

// Re-export unified error types from shared
pub use shared::{ApiError, ApiResponse, ApiResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __  ___           __        __
   /  |/  /___ ______/ /_____  / /_
  / /|_/ / __ `/ ___/ //_/ _ \/ __/
 / /  / / /_/ / /  / ,< /  __/ /_
/_/  /_/\__,_/_/  /_/|_|\___/\__/
    "#
    );
}

/// Prepare the process environment before anything else runs
///
/// Loads `.env`, ensures the work directory exists and wires up logging.
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    if work_dir != ":memory:" {
        std::fs::create_dir_all(&work_dir)?;
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
