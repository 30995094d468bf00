// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Runs in front of the member routes. When the request carries a bearer token
//! that passes strict validation, the member is resolved and stored in the
//! request extensions, where the [`Auth`](super::Auth) extractor picks it up.
//! Requests without a usable token pass through unauthenticated; handlers
//! that need a member reject them via their extractor.
//!
//! A token that validates but cannot be resolved (no roles claim, unknown
//! member, store outage) fails the request here.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), auth_middleware))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::extract_access_token;
use crate::state::AppState;

/// Authentication middleware function.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let resolved = match extract_access_token(request.headers()) {
        Some(token) if state.validator().validate(token) => {
            Some(state.resolver().resolve_authentication(token))
        }
        _ => None,
    };

    match resolved {
        Some(Ok(user)) => {
            tracing::debug!(member_id = %user.user_id(), "Authenticated request");
            request.extensions_mut().insert(user);
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Valid token failed to resolve to a member");
            return e.into_response();
        }
        None => {}
    }

    next.run(request).await
}
