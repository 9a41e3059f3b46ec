//! Fulfilment Module
//!
//! Order and job lifecycles. Which `(status, side, destination)` moves are
//! legal lives in the transition tables in `shared`; the services here add
//! three things on top:
//!
//! 1. party resolution: is the caller the buyer, the seller or the admin
//!    of this specific record
//! 2. the guarded storage update (expected status folded into the UPDATE)
//! 3. stale detection when the guard matches nothing
//!
//! The check order is fixed: existence, then party, then table legality,
//! then the guarded write. A request that loses a race gets a stale error,
//! never a silently re-applied transition.

pub mod job;
pub mod order;

pub use job::JobService;
pub use order::OrderService;

use shared::models::Role;
use shared::{ApiError, ApiResult};

use crate::auth::Actor;

/// Resolve which side of a transaction the actor is on
///
/// Admins act as the platform. Anyone else must be the seller or the buyer
/// of this record; the transition tables name the buyer side `CUSTOMER`
/// and the seller side `BUSINESS`.
pub(crate) fn party_for(actor: &Actor, buyer: &str, seller: &str) -> ApiResult<Role> {
    if actor.role == Role::Admin {
        return Ok(Role::Admin);
    }
    if actor.profile_id == seller {
        return Ok(Role::Business);
    }
    if actor.profile_id == buyer {
        return Ok(Role::Customer);
    }
    Err(ApiError::forbidden(
        "You are not a party to this transaction",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_resolution() {
        let admin = Actor::new("u1", "adm1", Role::Admin);
        let seller = Actor::new("u2", "biz1", Role::Business);
        let buyer = Actor::new("u3", "cust1", Role::Customer);
        let outsider = Actor::new("u4", "cust2", Role::Customer);

        assert_eq!(party_for(&admin, "cust1", "biz1").unwrap(), Role::Admin);
        assert_eq!(party_for(&seller, "cust1", "biz1").unwrap(), Role::Business);
        assert_eq!(party_for(&buyer, "cust1", "biz1").unwrap(), Role::Customer);
        assert!(party_for(&outsider, "cust1", "biz1").is_err());
    }
}
