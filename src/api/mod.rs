// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{auth::auth_middleware, state::AppState};

pub mod admin;
pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    // Routes that act on behalf of a member. A token that verifies but does
    // not resolve to a member fails here.
    let member_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route("/admin/members/{member_id}", get(admin::get_member))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Routes that look at a token without requiring its member to exist.
    let token_routes = Router::new().route("/auth/token/inspect", get(auth::inspect_token));

    #[cfg(feature = "dev")]
    let token_routes = token_routes.route(
        "/auth/dev/token",
        axum::routing::post(auth::issue_dev_token),
    );

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", member_routes.merge(token_routes))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

/// The served OpenAPI document.
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[allow(unused_mut)]
    let mut doc = ApiDoc::openapi();
    #[cfg(feature = "dev")]
    doc.merge(DevApiDoc::openapi());
    doc
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        users::get_current_user,
        auth::inspect_token,
        admin::get_member
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            users::UserMeResponse,
            auth::TokenInspection,
            admin::MemberResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Users", description = "Authenticated member information"),
        (name = "Auth", description = "Token inspection"),
        (name = "Admin", description = "Member administration")
    )
)]
struct ApiDoc;

#[cfg(feature = "dev")]
#[derive(OpenApi)]
#[openapi(
    paths(auth::issue_dev_token),
    components(schemas(auth::DevTokenRequest, crate::auth::TokenPair))
)]
struct DevApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{access_token_for, test_state};
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn send(uri: &str, bearer: Option<&str>) -> (StatusCode, serde_json::Value) {
        let state = test_state();
        let token = bearer.map(|member| access_token_for(&state, member));

        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = router(state)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(test_state());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn users_me_returns_member() {
        let (status, body) = send("/v1/users/me", Some("traveller")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["member_id"], "traveller");
        assert_eq!(body["roles"], serde_json::json!(["ROLE_USER"]));
    }

    #[tokio::test]
    async fn users_me_requires_token() {
        let (status, body) = send("/v1/users/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "missing_auth_header");
    }

    #[tokio::test]
    async fn admin_route_requires_admin_role() {
        let (status, _) = send("/v1/admin/members/traveller", Some("traveller")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send("/v1/admin/members/traveller", Some("admin")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["member_id"], "traveller");
    }

    async fn inspect(token: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .uri("/v1/auth/token/inspect")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = router(test_state()).oneshot(request).await.unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn inspect_reports_refresh_token() {
        let refresh = test_state().tokens.create_refresh_token().unwrap();

        let (status, body) = inspect(&refresh).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["expired"], false);
        assert!(body.get("subject").is_none());
    }

    #[tokio::test]
    async fn inspect_reports_token_of_unknown_member() {
        let token = test_state()
            .tokens
            .create_access_token("ghost", &["ROLE_USER"])
            .unwrap();

        let (status, body) = inspect(&token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["subject"], "ghost");
    }

    #[tokio::test]
    async fn member_routes_still_reject_unknown_member() {
        let state = test_state();
        let token = state.tokens.create_access_token("ghost", &["ROLE_USER"]).unwrap();

        let request = Request::builder()
            .uri("/v1/users/me")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = send("/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["credential_store"], "ok");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = router(test_state())
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[test]
    fn openapi_documents_bearer_scheme() {
        let doc = openapi();
        assert!(doc.paths.paths.contains_key("/v1/users/me"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer")));
    }
}
