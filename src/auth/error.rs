// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::store::CredentialStoreError;

/// Why a token failed verification.
///
/// Returned by [`TokenValidator::check`](super::TokenValidator::check);
/// [`TokenValidator::validate`](super::TokenValidator::validate) collapses
/// every variant to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenRejection {
    /// Empty or whitespace-only token string
    #[error("token is empty")]
    Empty,
    /// Not a well-formed `header.payload.signature` token
    #[error("token is malformed")]
    Malformed,
    /// Signature does not verify under the server key
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Well-formed, but signed with an algorithm this server does not accept
    #[error("token algorithm is not supported")]
    Unsupported,
    /// Correctly signed, but past its expiry
    #[error("token has expired")]
    Expired,
}

impl TokenRejection {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenRejection::Empty => "empty_token",
            TokenRejection::Malformed => "malformed_token",
            TokenRejection::InvalidSignature => "invalid_signature",
            TokenRejection::Unsupported => "unsupported_token",
            TokenRejection::Expired => "token_expired",
        }
    }
}

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Authorization header is not `Bearer <token>`
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// No `Refresh-Token` header present
    #[error("Refresh-Token header is required")]
    MissingRefreshToken,
    /// Token failed verification
    #[error("{0}")]
    Token(#[from] TokenRejection),
    /// Token carries no `sub` claim
    #[error("Token carries no subject")]
    MissingSubject,
    /// Token carries no `roles` claim
    #[error("Token carries no role information")]
    MissingRolesClaim,
    /// Token subject has no matching member
    #[error("No member found for token subject '{0}'")]
    UnknownPrincipal(String),
    /// Credential store could not be read
    #[error("Credential store unavailable: {0}")]
    CredentialStore(String),
    /// Token could not be signed
    #[error("Failed to create token: {0}")]
    TokenCreation(String),
    /// Insufficient permissions
    #[error("Insufficient permissions for this operation")]
    InsufficientPermissions,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MissingRefreshToken => "missing_refresh_token",
            AuthError::Token(rejection) => rejection.error_code(),
            AuthError::MissingSubject => "missing_subject",
            AuthError::MissingRolesClaim => "missing_roles_claim",
            AuthError::UnknownPrincipal(_) => "unknown_principal",
            AuthError::CredentialStore(_) => "credential_store_error",
            AuthError::TokenCreation(_) => "token_creation_error",
            AuthError::InsufficientPermissions => "insufficient_permissions",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MissingRefreshToken
            | AuthError::Token(_)
            | AuthError::MissingSubject
            | AuthError::UnknownPrincipal(_) => StatusCode::UNAUTHORIZED,
            AuthError::MissingRolesClaim | AuthError::InsufficientPermissions => {
                StatusCode::FORBIDDEN
            }
            AuthError::CredentialStore(_) | AuthError::TokenCreation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CredentialStoreError> for AuthError {
    fn from(e: CredentialStoreError) -> Self {
        match e {
            CredentialStoreError::NotFound(id) => AuthError::UnknownPrincipal(id),
            CredentialStoreError::Unavailable(msg) => AuthError::CredentialStore(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
