//! Error types for the shared crate
//!
//! Standardized error types used across the server and clients. Every error
//! is recoverable by the caller; the message states what went wrong and what
//! the caller can do about it.

use crate::{
    http::{Response, StatusCode},
    response::ApiResponse,
};
use thiserror::Error;

/// Standard API error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Success
    Success,
    /// Validation error (400)
    Validation,
    /// Authentication required (401)
    Unauthorized,
    /// Permission denied (403)
    Forbidden,
    /// Resource not found (404)
    NotFound,
    /// Resource already exists (409)
    Conflict,
    /// Cart line references neither a product nor a service (422)
    InvalidLine,
    /// Status transition not allowed by the lifecycle table (422)
    InvalidTransition,
    /// Status changed concurrently; the expected state is stale (409)
    StaleTransition,
    /// Withdrawal exceeds the available balance (422)
    InsufficientBalance,
    /// Payment collaborator declined or failed (402)
    PaymentFailed,
    /// Storage engine unreachable; safe to retry (503)
    StoreUnavailable,
    /// Internal server error (500)
    Internal,
    /// Database error (500)
    Database,
}

impl ApiErrorCode {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InvalidLine => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidTransition => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StaleTransition => StatusCode::CONFLICT,
            Self::InsufficientBalance => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PaymentFailed => StatusCode::PAYMENT_REQUIRED,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the default message for this error
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Validation => "Validation failed",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Permission denied",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource already exists",
            Self::InvalidLine => "Cart line must reference exactly one product or service",
            Self::InvalidTransition => "Status transition not allowed",
            Self::StaleTransition => "Status changed concurrently",
            Self::InsufficientBalance => "Insufficient available balance",
            Self::PaymentFailed => "Payment failed",
            Self::StoreUnavailable => "Store temporarily unavailable",
            Self::Internal => "Internal server error",
            Self::Database => "Database error",
        }
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Success => "E0000",
            Self::Validation => "E0002",
            Self::NotFound => "E0003",
            Self::Conflict => "E0004",
            Self::InvalidLine => "E1001",
            Self::InvalidTransition => "E1002",
            Self::StaleTransition => "E1003",
            Self::InsufficientBalance => "E1004",
            Self::PaymentFailed => "E1005",
            Self::Forbidden => "E2001",
            Self::Unauthorized => "E3001",
            Self::Internal => "E9001",
            Self::Database => "E9002",
            Self::StoreUnavailable => "E9003",
        }
    }

    /// Whether a client may safely retry the failed request as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable)
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Unified error type for the marketplace core
#[derive(Debug, Error)]
pub enum ApiError {
    /// Validation error
    #[error("{message}")]
    Validation { message: String },

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    /// Resource not found
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Resource already exists
    #[error("Resource already exists: {resource}")]
    Conflict { resource: String },

    /// Cart line references neither a product nor a service
    #[error("Invalid cart line: {message}")]
    InvalidLine { message: String },

    /// Transition rejected by the lifecycle table
    #[error("Invalid transition: {message}")]
    InvalidTransition { message: String },

    /// Transition lost a race: the entity moved on while this request ran
    #[error("Stale transition: {message}")]
    StaleTransition { message: String },

    /// Withdrawal exceeds available balance minus outstanding requests
    #[error("Insufficient balance: {message}")]
    InsufficientBalance { message: String },

    /// Payment collaborator declined or failed
    #[error("Payment failed: {message}")]
    PaymentFailed { message: String },

    /// Storage engine unreachable
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Database error
    #[error("Database error: {message}")]
    Database { message: String },

    /// Internal server error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    // ========== Convenient constructors ==========

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Create a Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    /// Create a NotFound error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a Conflict error
    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict { resource: resource.into() }
    }

    /// Create an InvalidLine error
    pub fn invalid_line(message: impl Into<String>) -> Self {
        Self::InvalidLine { message: message.into() }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition { message: message.into() }
    }

    /// Create a StaleTransition error
    pub fn stale_transition(message: impl Into<String>) -> Self {
        Self::StaleTransition { message: message.into() }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(message: impl Into<String>) -> Self {
        Self::InsufficientBalance { message: message.into() }
    }

    /// Create a PaymentFailed error
    pub fn payment_failed(message: impl Into<String>) -> Self {
        Self::PaymentFailed { message: message.into() }
    }

    /// Create a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable { message: message.into() }
    }

    /// Create a Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database { message: message.into() }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    // ========== Error inspection methods ==========

    /// Get the error code for this error
    pub fn error_code(&self) -> ApiErrorCode {
        match self {
            Self::Validation { .. } => ApiErrorCode::Validation,
            Self::Unauthorized => ApiErrorCode::Unauthorized,
            Self::Forbidden { .. } => ApiErrorCode::Forbidden,
            Self::NotFound { .. } => ApiErrorCode::NotFound,
            Self::Conflict { .. } => ApiErrorCode::Conflict,
            Self::InvalidLine { .. } => ApiErrorCode::InvalidLine,
            Self::InvalidTransition { .. } => ApiErrorCode::InvalidTransition,
            Self::StaleTransition { .. } => ApiErrorCode::StaleTransition,
            Self::InsufficientBalance { .. } => ApiErrorCode::InsufficientBalance,
            Self::PaymentFailed { .. } => ApiErrorCode::PaymentFailed,
            Self::StoreUnavailable { .. } => ApiErrorCode::StoreUnavailable,
            Self::Database { .. } => ApiErrorCode::Database,
            Self::Internal { .. } => ApiErrorCode::Internal,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Unauthorized => "Please authenticate first".to_string(),
            Self::Forbidden { message } => message.clone(),
            Self::NotFound { resource } => format!("{} not found", resource),
            Self::Conflict { resource } => format!("{} already exists", resource),
            Self::InvalidLine { message } => message.clone(),
            Self::InvalidTransition { message } => message.clone(),
            Self::StaleTransition { message } => message.clone(),
            Self::InsufficientBalance { message } => message.clone(),
            Self::PaymentFailed { message } => message.clone(),
            Self::StoreUnavailable { message } => message.clone(),
            Self::Database { message } => message.clone(),
            Self::Internal { message } => message.clone(),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> Response<axum::body::Body> {
        let code = self.error_code();
        let status = code.status_code();
        let message = self.message();

        let body = ApiResponse::<()>::error(code.code(), message);
        let json_body = serde_json::to_string(&body).unwrap_or_default();

        let body = json_body.into();

        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap_or_else(|_| {
                let body = "Internal error".into();
                http::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(body)
                    .unwrap()
            })
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
