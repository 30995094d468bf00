// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token creation and parsing.
//!
//! Access and refresh tokens are HS256 JWTs signed with the single secret
//! configured at startup. Parsing distinguishes a currently valid token from
//! one that is correctly signed but expired, so that callers can still read
//! the claims of an expired session (audit logging, "who was this") without
//! ever trusting a token whose signature does not verify.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::claims::{Principal, TokenClaims, TokenPair};
use super::error::{AuthError, TokenRejection};
use crate::config::AuthSettings;

/// Signature algorithm for every token this server issues.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Outcome of parsing a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedToken {
    /// Signature verifies and the token has not expired
    Valid(TokenClaims),
    /// Signature verifies but `exp` is in the past
    Expired(TokenClaims),
    /// Token cannot be trusted at all
    Invalid(TokenRejection),
}

impl ParsedToken {
    pub fn into_claims(self) -> Result<TokenClaims, TokenRejection> {
        match self {
            ParsedToken::Valid(claims) | ParsedToken::Expired(claims) => Ok(claims),
            ParsedToken::Invalid(rejection) => Err(rejection),
        }
    }
}

/// Issues and parses signed tokens.
///
/// Built once from [`AuthSettings`] and shared read-only across requests.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl_secs: i64,
    refresh_token_ttl_secs: i64,
    /// Signature + expiry
    strict: Validation,
    /// Signature only
    lenient: Validation,
}

impl TokenCodec {
    pub fn new(settings: &AuthSettings) -> Self {
        let mut strict = Validation::new(TOKEN_ALGORITHM);
        strict.leeway = 0;
        strict.validate_aud = false;

        let mut lenient = strict.clone();
        lenient.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret()),
            decoding_key: DecodingKey::from_secret(settings.secret()),
            access_token_ttl_secs: secs(settings.access_token_ttl),
            refresh_token_ttl_secs: secs(settings.refresh_token_ttl),
            strict,
            lenient,
        }
    }

    /// Create an access token for `subject` carrying `roles`.
    pub fn create_access_token<S: AsRef<str>>(
        &self,
        subject: &str,
        roles: &[S],
    ) -> Result<String, AuthError> {
        self.access_token_at(subject, roles, Utc::now())
    }

    /// Create a refresh token. It carries an expiry and nothing else.
    pub fn create_refresh_token(&self) -> Result<String, AuthError> {
        self.refresh_token_at(Utc::now())
    }

    /// Mint the access/refresh pair handed out at login.
    ///
    /// The refresh token is not persisted anywhere.
    pub fn generate_token_pair(&self, principal: &Principal) -> Result<TokenPair, AuthError> {
        let access_token =
            self.create_access_token(&principal.identifier, principal.roles.as_slice())?;
        let refresh_token = self.create_refresh_token()?;

        tracing::debug!(member_id = %principal.identifier, "Issued token pair");

        Ok(TokenPair::new(access_token, refresh_token))
    }

    /// Create an access token as if issued at `issued_at`.
    pub fn access_token_at<S: AsRef<str>>(
        &self,
        subject: &str,
        roles: &[S],
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = issued_at.timestamp();
        let claims = TokenClaims::access(
            subject,
            roles,
            iat,
            iat.saturating_add(self.access_token_ttl_secs),
        );
        self.sign(&claims)
    }

    /// Create a refresh token as if issued at `issued_at`.
    pub fn refresh_token_at(&self, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims::refresh(
            issued_at
                .timestamp()
                .saturating_add(self.refresh_token_ttl_secs),
        );
        self.sign(&claims)
    }

    /// Verify the signature and read the claims.
    ///
    /// An expired token with a good signature yields [`ParsedToken::Expired`]
    /// with its claims intact.
    pub fn parse(&self, token: &str) -> ParsedToken {
        if token.trim().is_empty() {
            return ParsedToken::Invalid(TokenRejection::Empty);
        }

        match decode::<TokenClaims>(token, &self.decoding_key, &self.strict) {
            Ok(data) => ParsedToken::Valid(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                // Expiry is checked after the signature, so re-reading
                // without it cannot admit a forged token.
                match decode::<TokenClaims>(token, &self.decoding_key, &self.lenient) {
                    Ok(data) => ParsedToken::Expired(data.claims),
                    Err(e) => ParsedToken::Invalid(rejection_for(&e)),
                }
            }
            Err(e) => ParsedToken::Invalid(rejection_for(&e)),
        }
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(TOKEN_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }
}

fn secs(ttl: std::time::Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
}

fn rejection_for(err: &jsonwebtoken::errors::Error) -> TokenRejection {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenRejection::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::InvalidAlgorithm => TokenRejection::Unsupported,
        _ => TokenRejection::Malformed,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    /// 32 bytes of 0x2a.
    pub(crate) const TEST_SECRET: &str = "KioqKioqKioqKioqKioqKioqKioqKioqKioqKioqKio=";

    /// 32 bytes of 0x07.
    const OTHER_SECRET: &str = "BwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwc=";

    pub(crate) fn test_codec() -> TokenCodec {
        codec_with(TEST_SECRET)
    }

    fn codec_with(secret: &str) -> TokenCodec {
        let settings = AuthSettings::new(
            secret,
            Duration::from_secs(60 * 60),
            Duration::from_secs(14 * 24 * 60 * 60),
        )
        .expect("valid test settings");
        TokenCodec::new(&settings)
    }

    #[test]
    fn access_token_round_trips_claims() {
        let codec = test_codec();
        let before = Utc::now().timestamp();
        let token = codec
            .create_access_token("user-42", &["ROLE_USER", "ROLE_ADMIN"])
            .unwrap();

        let ParsedToken::Valid(claims) = codec.parse(&token) else {
            panic!("fresh token should be valid");
        };
        assert_eq!(claims.sub.as_deref(), Some("user-42"));
        assert_eq!(claims.roles.as_deref(), Some("ROLE_USER,ROLE_ADMIN"));

        let iat = claims.iat.expect("access token carries iat");
        assert!(iat >= before);
        assert_eq!(claims.exp - iat, 3600);
    }

    #[test]
    fn token_has_three_segments() {
        let token = test_codec().create_access_token("m", &["ROLE_USER"]).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn refresh_token_carries_no_identity() {
        let codec = test_codec();
        let token = codec.create_refresh_token().unwrap();

        let ParsedToken::Valid(claims) = codec.parse(&token) else {
            panic!("fresh refresh token should be valid");
        };
        assert_eq!(claims.sub, None);
        assert_eq!(claims.roles, None);
        assert_eq!(claims.iat, None);
        assert!(claims.exp > Utc::now().timestamp() + 13 * 24 * 60 * 60);
    }

    #[test]
    fn expired_token_keeps_claims() {
        let codec = test_codec();
        let token = codec
            .access_token_at("user-42", &["ROLE_USER"], Utc::now() - chrono::Duration::hours(2))
            .unwrap();

        let parsed = codec.parse(&token);
        let ParsedToken::Expired(claims) = parsed else {
            panic!("expected expired, got {parsed:?}");
        };
        assert_eq!(claims.sub.as_deref(), Some("user-42"));
    }

    #[test]
    fn foreign_key_is_invalid_signature() {
        let token = codec_with(OTHER_SECRET)
            .create_access_token("user-42", &["ROLE_USER"])
            .unwrap();

        assert_eq!(
            test_codec().parse(&token),
            ParsedToken::Invalid(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn expired_foreign_token_is_not_readable() {
        let token = codec_with(OTHER_SECRET)
            .access_token_at("user-42", &["ROLE_USER"], Utc::now() - chrono::Duration::days(1))
            .unwrap();

        assert_eq!(
            test_codec().parse(&token),
            ParsedToken::Invalid(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn truncated_token_is_malformed() {
        let codec = test_codec();
        let token = codec.create_access_token("user-42", &["ROLE_USER"]).unwrap();
        let (head, _) = token.rsplit_once('.').unwrap();

        assert!(matches!(
            codec.parse(head),
            ParsedToken::Invalid(TokenRejection::Malformed)
        ));
        assert!(matches!(
            codec.parse("not-a-token"),
            ParsedToken::Invalid(TokenRejection::Malformed)
        ));
    }

    #[test]
    fn empty_token_is_rejected_as_empty() {
        let codec = test_codec();
        assert_eq!(codec.parse(""), ParsedToken::Invalid(TokenRejection::Empty));
        assert_eq!(codec.parse("   "), ParsedToken::Invalid(TokenRejection::Empty));
    }

    #[test]
    fn other_algorithm_is_unsupported() {
        let claims = TokenClaims::access("user-42", &["ROLE_ADMIN"], 0, i64::from(i32::MAX));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(&[0x2a; 32]),
        )
        .unwrap();

        assert_eq!(
            test_codec().parse(&token),
            ParsedToken::Invalid(TokenRejection::Unsupported)
        );
    }

    #[test]
    fn tampered_payload_fails_signature() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let codec = test_codec();
        let token = codec.create_access_token("user-42", &["ROLE_USER"]).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged = TokenClaims::access("user-42", &["ROLE_ADMIN"], 0, i64::from(i32::MAX));
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let tampered = format!("{}.{}.{}", parts[0], payload, parts[2]);

        assert_eq!(
            codec.parse(&tampered),
            ParsedToken::Invalid(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn token_pair_uses_principal() {
        let codec = test_codec();
        let pair = codec
            .generate_token_pair(&Principal::new("user-42", ["ROLE_USER"]))
            .unwrap();
        assert_eq!(pair.grant_type, "Bearer ");

        let access = codec.parse(&pair.access_token).into_claims().unwrap();
        assert_eq!(access.sub.as_deref(), Some("user-42"));

        let refresh = codec.parse(&pair.refresh_token).into_claims().unwrap();
        assert_eq!(refresh.sub, None);
    }
}
