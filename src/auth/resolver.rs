// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token → authenticated member resolution.
//!
//! Claims are read tolerantly: an expired but correctly signed token still
//! resolves. Callers that must reject expired tokens run
//! [`TokenValidator`](super::TokenValidator) first, as the request
//! extractor and middleware do.

use super::claims::{AuthenticatedUser, TokenClaims};
use super::codec::TokenCodec;
use super::error::AuthError;
use super::store::CredentialStore;

/// Resolves tokens into authenticated members.
pub struct AuthenticationResolver<'a> {
    codec: &'a TokenCodec,
    store: &'a dyn CredentialStore,
}

impl<'a> AuthenticationResolver<'a> {
    pub fn new(codec: &'a TokenCodec, store: &'a dyn CredentialStore) -> Self {
        Self { codec, store }
    }

    /// Load the member a token was issued to.
    ///
    /// Fails with [`AuthError::MissingRolesClaim`] when the token has no
    /// `roles` claim (refresh tokens, foreign tokens), and with
    /// [`AuthError::UnknownPrincipal`] when the subject is not a member.
    pub fn resolve_authentication(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.read_claims(token)?;

        if claims.roles.is_none() {
            tracing::warn!("Token without role information presented for authentication");
            return Err(AuthError::MissingRolesClaim);
        }

        let subject = claims.sub.ok_or(AuthError::MissingSubject)?;
        let principal = self.store.load_principal_by_identifier(&subject)?;

        Ok(AuthenticatedUser::new(principal, claims.exp))
    }

    /// Subject of a correctly signed token, expired or not.
    pub fn get_subject(&self, token: &str) -> Result<String, AuthError> {
        self.read_claims(token)?
            .sub
            .ok_or(AuthError::MissingSubject)
    }

    fn read_claims(&self, token: &str) -> Result<TokenClaims, AuthError> {
        Ok(self.codec.parse(token).into_claims()?)
    }
}
