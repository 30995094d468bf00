// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Well-known member roles.
//!
//! Principals carry roles as plain authority strings (`ROLE_USER`,
//! `ROLE_ADMIN`, ...) so that the credential store can hold roles this
//! server does not know about. `Role` names the ones handlers check.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Member roles known to the API.
///
/// - `User` - regular traveller, can book and review
/// - `Admin` - back-office staff, can manage members and places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// Authority string as stored on principals and in token claims.
    pub fn authority(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl Default for Role {
    /// Default role is User (least privilege for authenticated members).
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.authority())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serialized_authority() {
        for role in [Role::User, Role::Admin] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
    }

    #[test]
    fn serializes_as_authority() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, r#""ROLE_ADMIN""#);
    }

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }
}
