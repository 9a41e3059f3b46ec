//! Service layer - external collaborators
//!
//! # Services
//!
//! - [`PaymentGateway`] - charges buyers at checkout (trait seam)

pub mod payment;

pub use payment::{AutoApprovePayments, PaymentGateway, PaymentOutcome};
