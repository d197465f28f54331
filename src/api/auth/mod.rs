//! Token-protected endpoints
//!
//! `/me` requires any valid token; `/admin/ping` additionally requires one
//! of the configured admin roles.

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::{
    authentication_middleware, authorization_middleware, CurrentToken, RoleGate,
};
use crate::api::state::AppState;
use crate::domain::TokenInfo;

/// Create the router for token-protected endpoints
pub fn create_auth_router(state: &AppState) -> Router {
    let authenticated = Router::new().route("/me", get(get_current_token)).route_layer(
        middleware::from_fn_with_state(state.tokens.clone(), authentication_middleware),
    );

    let admin = Router::new().route("/admin/ping", get(admin_ping)).route_layer(
        middleware::from_fn_with_state(
            RoleGate::new(state.tokens.clone(), state.admin_roles.iter().cloned()),
            authorization_middleware,
        ),
    );

    authenticated.merge(admin)
}

/// Get the identity carried by the caller's token
///
/// GET /me
pub async fn get_current_token(CurrentToken(info): CurrentToken) -> Json<TokenInfo> {
    Json(info)
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
    pub subject_id: u32,
    pub role: String,
}

/// GET /admin/ping
pub async fn admin_ping(CurrentToken(info): CurrentToken) -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong",
        subject_id: info.subject_id,
        role: info.role,
    })
}
