//! Checkout Calculator
//!
//! The full price of one seller's checkout:
//!
//! ```text
//! subtotal   = sum(unit_price x quantity)
//! fee        = flat rate per delivery method
//! commission = round_to_unit(subtotal x mean(line rates) / 100)
//! total      = subtotal + fee + commission
//! ```
//!
//! The commission rate is the plain mean of the per-line rates: every line
//! contributes one rate regardless of its quantity or value. Lines without
//! a rate contribute [`DEFAULT_COMMISSION_PERCENT`].

use rust_decimal::Decimal;
use shared::ApiResult;
use shared::error::ApiError;
use shared::models::{CartLineView, DeliveryMethod, PricingBreakdown};

use super::money::{lines_subtotal_decimal, round_to_unit, to_decimal, to_f64};
use crate::utils::validation::{MAX_ADDRESS_LEN, validate_required_text};

/// Commission percent applied to lines that carry no per-item rate
pub const DEFAULT_COMMISSION_PERCENT: f64 = 10.0;

/// Flat delivery fee per method, in currency unit
pub fn delivery_fee(method: DeliveryMethod) -> f64 {
    match method {
        DeliveryMethod::Pickup => 0.0,
        DeliveryMethod::Standard => 300.0,
        DeliveryMethod::Express => 750.0,
    }
}

/// Commission on a subtotal, rounded to a whole currency unit
pub fn commission_amount(subtotal: Decimal, lines: &[CartLineView]) -> Decimal {
    if lines.is_empty() {
        return Decimal::ZERO;
    }
    let rate_sum: Decimal = lines
        .iter()
        .map(|line| to_decimal(line.commission_percent.unwrap_or(DEFAULT_COMMISSION_PERCENT)))
        .sum();
    let mean_rate = rate_sum / Decimal::from(lines.len());
    round_to_unit(subtotal * mean_rate / Decimal::ONE_HUNDRED)
}

/// Commission on a completed job's final price
pub fn job_commission(final_price: f64, percent: f64) -> f64 {
    to_f64(round_to_unit(
        to_decimal(final_price) * to_decimal(percent) / Decimal::ONE_HUNDRED,
    ))
}

/// Price one seller's checkout
///
/// An empty line set prices to all zeros; rejecting the actual checkout of
/// an empty cart is the orchestrator's job.
pub fn compute_checkout(lines: &[CartLineView], method: DeliveryMethod) -> PricingBreakdown {
    if lines.is_empty() {
        return PricingBreakdown::zero();
    }
    let subtotal = lines_subtotal_decimal(lines);
    let fee = to_decimal(delivery_fee(method));
    let commission = commission_amount(subtotal, lines);
    let total = subtotal + fee + commission;
    PricingBreakdown {
        subtotal: to_f64(subtotal),
        delivery_fee: to_f64(fee),
        commission: to_f64(commission),
        total: to_f64(total),
    }
}

/// Check the delivery method against the supplied address
///
/// Courier methods need a non-blank address; pickup ignores whatever was
/// sent along.
pub fn validate_delivery(method: DeliveryMethod, address: &Option<String>) -> ApiResult<()> {
    if !method.requires_address() {
        return Ok(());
    }
    match address {
        Some(addr) => validate_required_text(addr, "Delivery address", MAX_ADDRESS_LEN),
        None => Err(ApiError::validation(format!(
            "Delivery method {} requires a delivery address",
            method.as_str()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit_price: f64, quantity: i32, commission_percent: Option<f64>) -> CartLineView {
        CartLineView {
            id: format!("line-{unit_price}-{quantity}"),
            seller: "seller1".to_string(),
            item: shared::models::ItemRef::Product(format!("p{quantity}")),
            name: "Item".to_string(),
            unit_price,
            commission_percent,
            quantity,
            note: None,
        }
    }

    #[test]
    fn test_standard_delivery_breakdown() {
        // 2 x 500 at 10% plus 1 x 1000 at 20%: subtotal 2000, mean rate 15%,
        // commission 300, standard fee 300, total 2600
        let lines = vec![line(500.0, 2, Some(10.0)), line(1000.0, 1, Some(20.0))];
        let pricing = compute_checkout(&lines, DeliveryMethod::Standard);

        assert_eq!(pricing.subtotal, 2000.0);
        assert_eq!(pricing.delivery_fee, 300.0);
        assert_eq!(pricing.commission, 300.0);
        assert_eq!(pricing.total, 2600.0);
    }

    #[test]
    fn test_empty_lines_price_to_zero() {
        let pricing = compute_checkout(&[], DeliveryMethod::Express);
        assert_eq!(pricing, PricingBreakdown::zero());
    }

    #[test]
    fn test_fee_table() {
        assert_eq!(delivery_fee(DeliveryMethod::Pickup), 0.0);
        assert_eq!(delivery_fee(DeliveryMethod::Standard), 300.0);
        assert_eq!(delivery_fee(DeliveryMethod::Express), 750.0);
    }

    #[test]
    fn test_mean_rate_is_not_weighted_by_value() {
        // Plain mean of (0%, 20%) is 10% on a 1300 subtotal: 130.
        // A value-weighted mean would give 200.
        let lines = vec![line(300.0, 1, Some(0.0)), line(1000.0, 1, Some(20.0))];
        let pricing = compute_checkout(&lines, DeliveryMethod::Pickup);

        assert_eq!(pricing.subtotal, 1300.0);
        assert_eq!(pricing.commission, 130.0);
        assert_eq!(pricing.total, 1430.0);
    }

    #[test]
    fn test_missing_rate_falls_back_to_default() {
        // (default 10% + 20%) / 2 = 15% of 2000 = 300
        let lines = vec![line(1000.0, 1, None), line(1000.0, 1, Some(20.0))];
        let pricing = compute_checkout(&lines, DeliveryMethod::Pickup);
        assert_eq!(pricing.commission, 300.0);
    }

    #[test]
    fn test_commission_rounds_to_whole_unit() {
        // 999 at 10% = 99.9 rounds up to 100
        let lines = vec![line(999.0, 1, Some(10.0))];
        let pricing = compute_checkout(&lines, DeliveryMethod::Pickup);
        assert_eq!(pricing.commission, 100.0);

        // 150 at 15% = 22.5, midpoint rounds away from zero to 23
        let lines = vec![line(150.0, 1, Some(15.0))];
        let pricing = compute_checkout(&lines, DeliveryMethod::Pickup);
        assert_eq!(pricing.commission, 23.0);
    }

    #[test]
    fn test_job_commission_uses_snapshotted_rate() {
        assert_eq!(job_commission(8000.0, 10.0), 800.0);
        assert_eq!(job_commission(333.0, 10.0), 33.0);
        assert_eq!(job_commission(335.0, 10.0), 34.0);
    }

    #[test]
    fn test_courier_methods_require_address() {
        assert!(validate_delivery(DeliveryMethod::Pickup, &None).is_ok());
        assert!(validate_delivery(DeliveryMethod::Standard, &None).is_err());
        assert!(validate_delivery(DeliveryMethod::Express, &Some("  ".to_string())).is_err());
        assert!(
            validate_delivery(DeliveryMethod::Standard, &Some("12 Marina Rd".to_string())).is_ok()
        );
    }
}
