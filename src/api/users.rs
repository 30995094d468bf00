// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member self-service endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{Auth, AuthenticatedUser};

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Member identifier (the token subject)
    pub member_id: String,
    /// Authorities granted by the member store
    pub roles: Vec<String>,
    /// Access token expiry (Unix seconds)
    pub expires_at: i64,
}

impl From<AuthenticatedUser> for UserMeResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            member_id: user.principal.identifier,
            roles: user.principal.roles,
            expires_at: user.expires_at,
        }
    }
}

/// Get the current authenticated member.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Member information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Token carries no role information"),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<UserMeResponse> {
    Json(user.into())
}
