//! Pricing Module
//!
//! Pure checkout arithmetic: given cart lines and a delivery method, produce
//! the full breakdown. No storage, no clock, no collaborators; everything in
//! here is a function of its arguments, which is what makes the checkout
//! orchestrator testable without a database.

pub mod calculator;
pub mod money;

pub use calculator::{
    DEFAULT_COMMISSION_PERCENT, commission_amount, compute_checkout, delivery_fee, job_commission,
    validate_delivery,
};
