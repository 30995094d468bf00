// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Strict token validation: signature and expiry.

use super::claims::TokenClaims;
use super::codec::{ParsedToken, TokenCodec};
use super::error::TokenRejection;

/// Checks whether a token is currently trustworthy.
pub struct TokenValidator<'a> {
    codec: &'a TokenCodec,
}

impl<'a> TokenValidator<'a> {
    pub fn new(codec: &'a TokenCodec) -> Self {
        Self { codec }
    }

    /// Verify signature and expiry, returning the claims or the reason the
    /// token was rejected.
    ///
    /// Rejections are logged; the token itself never is.
    pub fn check(&self, token: &str) -> Result<TokenClaims, TokenRejection> {
        let rejection = match self.codec.parse(token) {
            ParsedToken::Valid(claims) => return Ok(claims),
            ParsedToken::Expired(_) => TokenRejection::Expired,
            ParsedToken::Invalid(rejection) => rejection,
        };

        match rejection {
            TokenRejection::Empty => tracing::info!("JWT claims string is empty"),
            TokenRejection::Malformed | TokenRejection::InvalidSignature => {
                tracing::info!(reason = %rejection, "Invalid JWT token")
            }
            TokenRejection::Unsupported => tracing::info!("Unsupported JWT token"),
            TokenRejection::Expired => tracing::info!("Expired JWT token"),
        }

        Err(rejection)
    }

    /// `true` only for a correctly signed, unexpired token.
    pub fn validate(&self, token: &str) -> bool {
        self.check(token).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::codec::tests::test_codec;
    use chrono::Utc;

    #[test]
    fn fresh_token_validates() {
        let codec = test_codec();
        let token = codec
            .create_access_token("user-42", &["ROLE_USER", "ROLE_ADMIN"])
            .unwrap();

        let validator = TokenValidator::new(&codec);
        assert!(validator.validate(&token));
        assert_eq!(
            validator.check(&token).unwrap().sub.as_deref(),
            Some("user-42")
        );
    }

    #[test]
    fn fresh_refresh_token_validates() {
        let codec = test_codec();
        let token = codec.create_refresh_token().unwrap();
        assert!(TokenValidator::new(&codec).validate(&token));
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let codec = test_codec();
        let token = codec
            .access_token_at("user-42", &["ROLE_USER"], Utc::now() - chrono::Duration::hours(2))
            .unwrap();

        let validator = TokenValidator::new(&codec);
        assert!(!validator.validate(&token));
        assert_eq!(validator.check(&token), Err(TokenRejection::Expired));
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = test_codec();
        let validator = TokenValidator::new(&codec);

        assert!(!validator.validate(""));
        assert!(!validator.validate("abc.def.ghi"));
        assert_eq!(validator.check(""), Err(TokenRejection::Empty));
        assert_eq!(validator.check("abc.def.ghi"), Err(TokenRejection::Malformed));
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let codec = test_codec();
        let token = codec.create_access_token("user-42", &["ROLE_USER"]).unwrap();
        let truncated = &token[..token.len() - 4];

        let validator = TokenValidator::new(&codec);
        assert!(!validator.validate(truncated));
        assert!(!validator.validate(&token[..token.len() / 2]));
    }
}
