//! Utility module
//!
//! - [`error`]: response helpers over the shared error types
//! - [`logger`]: tracing setup
//! - [`time`]: timestamp helpers
//! - [`validation`]: input limits and text validation

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{ApiError, ApiResponse, ApiResult, ok, ok_with_message};
