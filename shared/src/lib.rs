//! Shared types for the marketplace transaction core
//!
//! Common types used by the server and by API clients: domain models,
//! status machines, error types and the response envelope.

pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use models::Role;
pub use response::ApiResponse;
