// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin endpoints.
//!
//! Every handler requires the `ROLE_ADMIN` authority via [`AdminOnly`].

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{AdminOnly, CredentialStoreError, Principal};
use crate::error::ApiError;
use crate::state::AppState;

/// A member as the credential store reports it.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub member_id: String,
    pub roles: Vec<String>,
}

impl From<Principal> for MemberResponse {
    fn from(principal: Principal) -> Self {
        Self {
            member_id: principal.identifier,
            roles: principal.roles,
        }
    }
}

/// Look up a member's principal.
#[utoipa::path(
    get,
    path = "/v1/admin/members/{member_id}",
    tag = "Admin",
    security(("bearer" = [])),
    params(("member_id" = String, Path, description = "Member identifier")),
    responses(
        (status = 200, description = "Member principal", body = MemberResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "No such member"),
    )
)]
pub async fn get_member(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    tracing::info!(admin_id = %admin.user_id(), member_id = %member_id, "Admin member lookup");

    match state.credentials.load_principal_by_identifier(&member_id) {
        Ok(principal) => Ok(Json(principal.into())),
        Err(CredentialStoreError::NotFound(_)) => {
            Err(ApiError::not_found(format!("Member {member_id} not found")))
        }
        Err(CredentialStoreError::Unavailable(e)) => {
            tracing::error!(error = %e, "Credential store unavailable");
            Err(ApiError::internal("Credential store unavailable"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::state::tests::test_state;
    use axum::http::StatusCode;

    fn admin() -> AdminOnly {
        AdminOnly(AuthenticatedUser::new(
            Principal::new("admin", ["ROLE_USER", "ROLE_ADMIN"]),
            0,
        ))
    }

    #[tokio::test]
    async fn returns_stored_roles() {
        let Json(member) = get_member(admin(), State(test_state()), Path("admin".to_string()))
            .await
            .unwrap();
        assert_eq!(member.member_id, "admin");
        assert_eq!(member.roles, vec!["ROLE_USER", "ROLE_ADMIN"]);
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let err = get_member(admin(), State(test_state()), Path("ghost".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
