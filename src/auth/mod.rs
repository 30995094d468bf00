// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Member authentication with self-issued HS256 JWTs.
//!
//! ## Auth Flow
//!
//! 1. At login the server mints a [`TokenPair`]: a short-lived access token
//!    (`sub`, `roles`, `iat`, `exp`) and a long-lived refresh token (`exp`
//!    only)
//! 2. Clients send `Authorization: Bearer <access token>`
//! 3. The server:
//!    - extracts the token from the header ([`extract_access_token`])
//!    - verifies signature and expiry ([`TokenValidator`])
//!    - loads the member named by `sub` from the [`CredentialStore`]
//!      ([`AuthenticationResolver`])
//!    - hands handlers an [`AuthenticatedUser`] carrying the stored roles
//!
//! ## Security
//!
//! - One symmetric key, decoded once at startup, never mutated
//! - No clock-skew leeway on expiry
//! - Tokens are stateless: there is no revocation list and refresh tokens
//!   are not persisted

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod resolver;
pub mod roles;
pub mod store;
pub mod validator;

pub use claims::{AuthenticatedUser, Principal, TokenClaims, TokenPair};
pub use codec::{ParsedToken, TokenCodec};
pub use error::{AuthError, TokenRejection};
pub use extractor::{
    extract_access_token, extract_refresh_token, AdminOnly, Auth, OptionalAuth, RefreshToken,
};
pub use middleware::auth_middleware;
pub use resolver::AuthenticationResolver;
pub use roles::Role;
pub use store::{CredentialStore, CredentialStoreError, InMemoryCredentialStore};
pub use validator::TokenValidator;
