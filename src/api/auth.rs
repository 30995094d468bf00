// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token endpoints.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{extract_access_token, AuthError, ParsedToken};
use crate::state::AppState;

#[cfg(feature = "dev")]
use crate::auth::TokenPair;
#[cfg(feature = "dev")]
use serde::Deserialize;

/// Response for GET /v1/auth/token/inspect
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenInspection {
    /// Signature verifies and the token has not expired
    pub valid: bool,
    /// Signature verifies but the token has expired
    pub expired: bool,
    /// Subject, when the token is correctly signed and carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Why the token was rejected, when it is neither valid nor expired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

impl From<ParsedToken> for TokenInspection {
    fn from(parsed: ParsedToken) -> Self {
        match parsed {
            ParsedToken::Valid(claims) => Self {
                valid: true,
                expired: false,
                subject: claims.sub,
                rejection: None,
            },
            ParsedToken::Expired(claims) => Self {
                valid: false,
                expired: true,
                subject: claims.sub,
                rejection: None,
            },
            ParsedToken::Invalid(rejection) => Self {
                valid: false,
                expired: false,
                subject: None,
                rejection: Some(rejection.error_code().to_string()),
            },
        }
    }
}

/// Report on the bearer token without authenticating the request.
///
/// Expired tokens still report their subject.
#[utoipa::path(
    get,
    path = "/v1/auth/token/inspect",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token report", body = TokenInspection),
        (status = 401, description = "Missing or malformed Authorization header"),
    )
)]
pub async fn inspect_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenInspection>, AuthError> {
    if !headers.contains_key(axum::http::header::AUTHORIZATION) {
        return Err(AuthError::MissingAuthHeader);
    }
    let token = extract_access_token(&headers).ok_or(AuthError::InvalidAuthHeader)?;

    Ok(Json(state.tokens.parse(token).into()))
}

/// Request body for POST /v1/auth/dev/token
#[cfg(feature = "dev")]
#[derive(Debug, Deserialize, ToSchema)]
pub struct DevTokenRequest {
    /// Existing member to issue tokens for
    pub member_id: String,
}

/// Issue a token pair for an existing member (development builds only).
///
/// No credential check happens here.
#[cfg(feature = "dev")]
#[utoipa::path(
    post,
    path = "/v1/auth/dev/token",
    tag = "Auth",
    request_body = DevTokenRequest,
    responses(
        (status = 200, description = "Token pair", body = TokenPair),
        (status = 401, description = "Unknown member"),
    )
)]
pub async fn issue_dev_token(
    State(state): State<AppState>,
    Json(request): Json<DevTokenRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let principal = state
        .credentials
        .load_principal_by_identifier(&request.member_id)?;

    tracing::warn!(member_id = %principal.identifier, "Issuing development token pair");

    Ok(Json(state.tokens.generate_token_pair(&principal)?))
}
