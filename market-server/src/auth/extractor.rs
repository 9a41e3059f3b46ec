//! Identity Extractors
//!
//! Custom extractors that read the gateway's identity headers. Handlers
//! declare [`Actor`] or [`CartIdentity`] as a parameter and rejection turns
//! into the standard error envelope.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::models::Role;
use shared::{ApiError, ApiResult};

/// Account ID at the identity provider
pub const USER_HEADER: &str = "x-user-id";
/// Active marketplace profile (customer or business)
pub const PROFILE_HEADER: &str = "x-profile-id";
/// Role of the active profile
pub const ROLE_HEADER: &str = "x-role";
/// Device installation id, present on all app traffic
pub const DEVICE_HEADER: &str = "x-device-id";

/// Signed-in request context
#[derive(Debug, Clone)]
pub struct Actor {
    /// Account ID at the identity provider
    pub user_id: String,
    /// Marketplace profile ID the request acts as
    pub profile_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, profile_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            profile_id: profile_id.into(),
            role,
        }
    }

    pub fn require_role(&self, role: Role) -> ApiResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "This operation requires the {} role",
                role
            )))
        }
    }

    pub fn require_admin(&self) -> ApiResult<()> {
        self.require_role(Role::Admin)
    }

    pub fn require_business(&self) -> ApiResult<()> {
        self.require_role(Role::Business)
    }
}

/// Who a cart belongs to
///
/// Signed-in buyers get the persisted cart keyed by profile; anonymous
/// callers get the device-local cart keyed by device id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartIdentity {
    User { profile: String },
    Guest { device: String },
}

impl CartIdentity {
    /// The buyer key lines are stored under
    pub fn buyer_key(&self) -> &str {
        match self {
            Self::User { profile } => profile,
            Self::Guest { device } => device,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest { .. })
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_HEADER).ok_or(ApiError::Unauthorized)?;
        let profile_id = header_value(parts, PROFILE_HEADER).ok_or(ApiError::Unauthorized)?;
        let role = header_value(parts, ROLE_HEADER)
            .ok_or(ApiError::Unauthorized)?
            .parse::<Role>()
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(Actor::new(user_id, profile_id, role))
    }
}

impl<S> FromRequestParts<S> for CartIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = header_value(parts, USER_HEADER);
        let profile = header_value(parts, PROFILE_HEADER);
        let role = header_value(parts, ROLE_HEADER);

        match (user, profile, role) {
            (Some(_), Some(profile), Some(_)) => Ok(Self::User {
                profile: profile.to_string(),
            }),
            // No identity headers at all: fall back to the device cart
            (None, None, None) => match header_value(parts, DEVICE_HEADER) {
                Some(device) => Ok(Self::Guest {
                    device: device.to_string(),
                }),
                None => Err(ApiError::Unauthorized),
            },
            // Partial identity means a broken gateway, not a guest
            _ => Err(ApiError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = http::Request::builder().uri("/api/cart");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_actor_needs_all_three_headers() {
        let mut parts = parts_with(&[
            (USER_HEADER, "u1"),
            (PROFILE_HEADER, "biz1"),
            (ROLE_HEADER, "BUSINESS"),
        ]);
        let actor = Actor::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(actor.profile_id, "biz1");
        assert_eq!(actor.role, Role::Business);

        let mut partial = parts_with(&[(USER_HEADER, "u1")]);
        assert!(Actor::from_request_parts(&mut partial, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_actor_rejects_unknown_role() {
        let mut parts = parts_with(&[
            (USER_HEADER, "u1"),
            (PROFILE_HEADER, "p1"),
            (ROLE_HEADER, "SUPERUSER"),
        ]);
        assert!(Actor::from_request_parts(&mut parts, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_cart_identity_prefers_profile_over_device() {
        let mut parts = parts_with(&[
            (USER_HEADER, "u1"),
            (PROFILE_HEADER, "cust1"),
            (ROLE_HEADER, "CUSTOMER"),
            (DEVICE_HEADER, "dev1"),
        ]);
        let identity = CartIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(
            identity,
            CartIdentity::User {
                profile: "cust1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_cart_identity_falls_back_to_device() {
        let mut parts = parts_with(&[(DEVICE_HEADER, "dev1")]);
        let identity = CartIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(identity.is_guest());
        assert_eq!(identity.buyer_key(), "dev1");
    }

    #[tokio::test]
    async fn test_cart_identity_rejects_partial_identity() {
        let mut parts = parts_with(&[(USER_HEADER, "u1"), (DEVICE_HEADER, "dev1")]);
        assert!(
            CartIdentity::from_request_parts(&mut parts, &())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_role_guards() {
        let admin = Actor::new("u1", "adm1", Role::Admin);
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_business().is_err());

        let seller = Actor::new("u2", "biz1", Role::Business);
        assert!(seller.require_business().is_ok());
        assert!(seller.require_admin().is_err());
    }
}
