use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint (no auth)
        .route("/health", get(health::health_check))
        // Token-protected endpoints
        .merge(auth::create_auth_router(&state))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::auth::{JwtConfig, JwtService, TokenService};

    fn state() -> AppState {
        let tokens = Arc::new(JwtService::new(JwtConfig::new("router-secret", 10)));
        AppState::new(tokens, vec!["admin".to_string()])
    }

    async fn get_json(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = get_json(create_router(state()), "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_me_returns_identity() {
        let state = state();
        let token = state.tokens.generate_token(42, "editor").unwrap();

        let (status, body) = get_json(create_router(state), "/me", Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject_id"], 42);
        assert_eq!(body["role"], "editor");
    }

    #[tokio::test]
    async fn test_admin_requires_admin_role() {
        let state = state();
        let editor = state.tokens.generate_token(1, "editor").unwrap();
        let admin = state.tokens.generate_token(2, "admin").unwrap();

        let (status, _) = get_json(create_router(state.clone()), "/admin/ping", Some(&editor)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = get_json(create_router(state), "/admin/ping", Some(&admin)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "pong");
        assert_eq!(body["subject_id"], 2);
    }

    #[tokio::test]
    async fn test_me_without_token_is_bad_request() {
        let (status, body) = get_json(create_router(state()), "/me", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid request");
    }
}
