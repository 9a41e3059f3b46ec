//! Marketplace roles
//!
//! The transition tables key on these, so they live next to the status
//! enums rather than in the server. In the tables, `Customer` names the
//! buyer side of a transaction and `Business` the seller side.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Marketplace role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Buyer side: owns carts, places orders and job requests
    Customer,
    /// Seller side: fulfils orders, quotes jobs, withdraws earnings
    Business,
    /// Platform operator: refunds, disputes, settlement, withdrawals
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Business => "BUSINESS",
            Self::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CUSTOMER" => Ok(Self::Customer),
            "BUSINESS" => Ok(Self::Business),
            "ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("customer".parse::<Role>(), Ok(Role::Customer));
        assert_eq!("BUSINESS".parse::<Role>(), Ok(Role::Business));
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert!("manager".parse::<Role>().is_err());
    }
}
