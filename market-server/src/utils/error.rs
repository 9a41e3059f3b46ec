//! Response helpers
//!
//! Error types live in `shared`; this module adds the success-side helpers
//! handlers use to wrap data in the envelope.

use axum::Json;
use serde::Serialize;

pub use shared::{ApiError, ApiResponse, ApiResult};

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok_with_message(data, message))
}
