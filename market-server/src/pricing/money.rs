//! Money arithmetic
//!
//! Amounts live as `f64` in storage and on the wire; every computation runs
//! through `Decimal` so repeated additions cannot accumulate float error.
//! Midpoints round away from zero.

use rust_decimal::prelude::*;
use shared::models::CartLineView;

/// Currency precision for stored amounts
pub const DECIMAL_PLACES: u32 = 2;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Back to the wire representation, rounded to currency precision
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Round to a whole currency unit (commission rule)
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of `unit_price x quantity` over the lines
pub fn lines_subtotal_decimal(lines: &[CartLineView]) -> Decimal {
    lines
        .iter()
        .map(|line| to_decimal(line.unit_price) * Decimal::from(line.quantity))
        .sum()
}

/// [`lines_subtotal_decimal`] at currency precision
pub fn lines_subtotal(lines: &[CartLineView]) -> f64 {
    to_f64(lines_subtotal_decimal(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ItemRef;

    fn view(unit_price: f64, quantity: i32) -> CartLineView {
        CartLineView {
            id: "line".to_string(),
            seller: "seller".to_string(),
            item: ItemRef::Product("p".to_string()),
            name: "Item".to_string(),
            unit_price,
            commission_percent: None,
            quantity,
            note: None,
        }
    }

    #[test]
    fn test_subtotal_multiplies_and_sums() {
        let lines = vec![view(500.0, 2), view(1000.0, 1)];
        assert_eq!(lines_subtotal(&lines), 2000.0);
    }

    #[test]
    fn test_subtotal_avoids_float_drift() {
        // 0.1 x 3 in plain f64 is 0.30000000000000004
        let lines = vec![view(0.1, 3)];
        assert_eq!(lines_subtotal(&lines), 0.3);
    }

    #[test]
    fn test_round_to_unit_midpoint_goes_away_from_zero() {
        assert_eq!(round_to_unit(to_decimal(22.5)), to_decimal(23.0));
        assert_eq!(round_to_unit(to_decimal(22.4)), to_decimal(22.0));
        assert_eq!(round_to_unit(to_decimal(-22.5)), to_decimal(-23.0));
    }
}
