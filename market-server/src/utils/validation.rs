//! Input validation helpers
//!
//! Centralized limits and validation functions for the request boundary.
//! Repositories and services assume text passed in already satisfies them.

use shared::ApiError;

// ── Limits ──────────────────────────────────────────────────────────

/// Notes, rejection reasons, job descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Job titles, item names, bank and account names
pub const MAX_NAME_LEN: usize = 200;

/// Delivery addresses and job locations
pub const MAX_ADDRESS_LEN: usize = 500;

/// Largest quantity a single cart line may carry
pub const MAX_LINE_QUANTITY: i32 = 999;

/// Largest monetary amount accepted from a request, in currency unit
pub const MAX_AMOUNT: f64 = 100_000_000.0;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(ApiError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), ApiError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(ApiError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a cart line quantity for add and set operations.
pub fn validate_quantity(quantity: i32) -> Result<(), ApiError> {
    if quantity < 1 {
        return Err(ApiError::validation("Quantity must be at least 1"));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(ApiError::validation(format!(
            "Quantity {quantity} exceeds the limit of {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

/// Validate a monetary amount from a request: finite, positive, bounded.
pub fn validate_amount(amount: f64, field: &str) -> Result<(), ApiError> {
    if !amount.is_finite() {
        return Err(ApiError::validation(format!("{field} must be a number")));
    }
    if amount <= 0.0 {
        return Err(ApiError::validation(format!(
            "{field} must be greater than zero"
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(ApiError::validation(format!(
            "{field} exceeds the limit of {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_blank() {
        assert!(validate_required_text("  ", "Title", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Fix my sink", "Title", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn test_optional_text_checks_length_only_when_present() {
        assert!(validate_optional_text(&None, "Note", 5).is_ok());
        assert!(validate_optional_text(&Some("okay".to_string()), "Note", 5).is_ok());
        assert!(validate_optional_text(&Some("too long".to_string()), "Note", 5).is_err());
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_amount_bounds() {
        assert!(validate_amount(f64::NAN, "Amount").is_err());
        assert!(validate_amount(0.0, "Amount").is_err());
        assert!(validate_amount(-10.0, "Amount").is_err());
        assert!(validate_amount(2500.0, "Amount").is_ok());
    }
}
