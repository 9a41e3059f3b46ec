//! Request identity
//!
//! Authentication happens at the platform gateway; this server trusts the
//! identity headers the gateway forwards and only decides what each role
//! may do. Two extractors cover the two kinds of caller:
//!
//! - [`Actor`]: a signed-in user (customer, business or admin profile)
//! - [`CartIdentity`]: either a signed-in buyer or an anonymous device,
//!   for the cart endpoints that serve both

pub mod extractor;

pub use extractor::{
    Actor, CartIdentity, DEVICE_HEADER, PROFILE_HEADER, ROLE_HEADER, USER_HEADER,
};
