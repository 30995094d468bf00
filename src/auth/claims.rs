// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims, principals and the login token pair.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Separator used to join roles into the `roles` claim.
pub const ROLES_SEPARATOR: &str = ",";

/// Scheme label handed back to clients with every token pair.
pub const GRANT_TYPE: &str = "Bearer ";

/// Payload of an access or refresh token.
///
/// Access tokens carry `sub`, `roles`, `iat` and `exp`. Refresh tokens carry
/// only `exp` so a stolen refresh token reveals nothing about its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (member ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Roles joined with [`ROLES_SEPARATOR`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<String>,
    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration timestamp
    pub exp: i64,
}

impl TokenClaims {
    /// Claims for an access token.
    pub fn access<S: AsRef<str>>(subject: &str, roles: &[S], issued_at: i64, expires_at: i64) -> Self {
        let roles = roles
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(ROLES_SEPARATOR);

        Self {
            sub: Some(subject.to_string()),
            roles: Some(roles),
            iat: Some(issued_at),
            exp: expires_at,
        }
    }

    /// Claims for a refresh token.
    pub fn refresh(expires_at: i64) -> Self {
        Self {
            sub: None,
            roles: None,
            iat: None,
            exp: expires_at,
        }
    }
}

/// A member identity as held by the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Unique member identifier
    pub identifier: String,
    /// Granted roles, in store order
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new<S: Into<String>>(identifier: impl Into<String>, roles: impl IntoIterator<Item = S>) -> Self {
        Self {
            identifier: identifier.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Roles as an order-insensitive set.
    pub fn authorities(&self) -> BTreeSet<&str> {
        self.roles.iter().map(String::as_str).collect()
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.roles.iter().any(|r| r == authority)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.has_authority(role.authority())
    }
}

/// The identity a request was authenticated as.
///
/// Bound to the principal freshly loaded from the credential store; its
/// authorities are the stored roles, not the roles echoed in the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub principal: Principal,
    /// Expiry of the token the request presented (Unix timestamp)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn new(principal: Principal, expires_at: i64) -> Self {
        Self {
            principal,
            expires_at,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.principal.identifier
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.principal.has_role(role)
    }

    /// Check if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Tokens handed to a member at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Always [`GRANT_TYPE`]
    pub grant_type: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            grant_type: GRANT_TYPE.to_string(),
            access_token,
            refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_claims_join_roles_with_comma() {
        let claims = TokenClaims::access("user-42", &["ROLE_USER", "ROLE_ADMIN"], 100, 200);
        assert_eq!(claims.sub.as_deref(), Some("user-42"));
        assert_eq!(claims.roles.as_deref(), Some("ROLE_USER,ROLE_ADMIN"));
        assert_eq!(claims.iat, Some(100));
        assert_eq!(claims.exp, 200);
    }

    #[test]
    fn access_claims_keep_empty_role_list_present() {
        let empty = TokenClaims::access::<&str>("u", &[], 0, 1);
        assert_eq!(empty.roles.as_deref(), Some(""));
        assert_eq!(TokenClaims::refresh(1).roles, None);
    }

    #[test]
    fn refresh_claims_serialize_expiry_only() {
        let json = serde_json::to_value(TokenClaims::refresh(1_700_000_000)).unwrap();
        assert_eq!(json, serde_json::json!({ "exp": 1_700_000_000 }));
    }

    #[test]
    fn authorities_ignore_order() {
        let a = Principal::new("m", ["ROLE_ADMIN", "ROLE_USER"]);
        let b = Principal::new("m", ["ROLE_USER", "ROLE_ADMIN"]);
        assert_eq!(a.authorities(), b.authorities());
    }

    #[test]
    fn admin_check_uses_stored_roles() {
        let user = AuthenticatedUser::new(Principal::new("m", ["ROLE_USER"]), 0);
        assert!(user.has_role(Role::User));
        assert!(!user.is_admin());

        let admin = AuthenticatedUser::new(Principal::new("a", ["ROLE_ADMIN"]), 0);
        assert!(admin.is_admin());
    }

    #[test]
    fn token_pair_uses_bearer_scheme() {
        let pair = TokenPair::new("a.b.c".to_string(), "d.e.f".to_string());
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["grantType"], "Bearer ");
        assert_eq!(json["accessToken"], "a.b.c");
        assert_eq!(json["refreshToken"], "d.e.f");
    }
}
