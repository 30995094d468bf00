// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request token extraction and Axum extractors for authenticated members.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{
        header::AUTHORIZATION,
        request::Parts,
        HeaderMap,
    },
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Prefix of a bearer credential in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Header carrying the refresh token, verbatim.
pub const REFRESH_TOKEN_HEADER: &str = "refresh-token";

/// Access token from `Authorization: Bearer <token>`.
///
/// The prefix match is case-sensitive; anything else yields `None`.
pub fn extract_access_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// Refresh token from the `Refresh-Token` header, whenever present.
pub fn extract_refresh_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(REFRESH_TOKEN_HEADER)?.to_str().ok()
}

/// Run the full check on the request's bearer token: extract, validate
/// strictly, resolve the member.
pub fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<AuthenticatedUser, AuthError> {
    if !headers.contains_key(AUTHORIZATION) {
        return Err(AuthError::MissingAuthHeader);
    }

    let token = extract_access_token(headers).ok_or(AuthError::InvalidAuthHeader)?;

    state.validator().check(token)?;
    state.resolver().resolve_authentication(token)
}

/// Extractor for authenticated members.
///
/// Reuses the member set by [`auth_middleware`](super::middleware::auth_middleware)
/// when present, otherwise authenticates the bearer token itself.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_reservations(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<Reservation>>, ApiError> {
///     // user.principal.identifier is the member ID
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        authenticate(&parts.headers, state).map(Auth)
    }
}

/// Extractor that requires the `ROLE_ADMIN` authority.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(user))
    }
}

/// Optional authentication extractor.
///
/// Returns `None` if no valid authentication is present, instead of rejecting.
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(user)) => Ok(OptionalAuth(Some(user))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

/// Extractor for the raw `Refresh-Token` header.
///
/// Only extracts; the token is not verified here.
pub struct RefreshToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for RefreshToken {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_refresh_token(&parts.headers)
            .map(|token| RefreshToken(token.to_string()))
            .ok_or(AuthError::MissingRefreshToken)
    }
}
