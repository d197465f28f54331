//! Bearer token authentication and role authorization middleware
//!
//! Both middlewares share [`authenticate`] and differ only in the policy
//! applied to the resulting [`TokenInfo`]:
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(middleware::from_fn_with_state(tokens.clone(), authentication_middleware))
//!     .merge(
//!         Router::new()
//!             .route("/admin", get(admin))
//!             .route_layer(middleware::from_fn_with_state(
//!                 RoleGate::new(tokens, ["admin", "editor"]),
//!                 authorization_middleware,
//!             )),
//!     );
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{header, request::Parts, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};

use crate::api::types::ApiError;
use crate::domain::{DomainError, TokenInfo};
use crate::infrastructure::auth::TokenService;

/// Token service shared across request handlers
pub type SharedTokenService = Arc<dyn TokenService>;

const INVALID_REQUEST: &str = "invalid request";
const UNAUTHORIZED: &str = "Unauthorized access";
const ACCESS_DENIED: &str = "Access for resource denied";

/// Extract the raw token from the `token` query parameter or the
/// `Authorization` header
///
/// Only the first `token` query pair counts. The header must be exactly
/// `"<scheme> <token>"` split on a single space; the scheme itself is not
/// inspected.
pub fn extract_token(uri: &Uri, headers: &HeaderMap) -> Result<String, DomainError> {
    let from_query = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(pairs)| pairs.into_iter().find(|(key, _)| key == "token"))
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty());

    if let Some(token) = from_query {
        return Ok(token);
    }

    let authorization = match headers.get(header::AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| DomainError::invalid_request(INVALID_REQUEST))?,
        None => "",
    };

    match authorization.split(' ').collect::<Vec<_>>().as_slice() {
        [_scheme, token] if !token.is_empty() => Ok((*token).to_string()),
        _ => Err(DomainError::invalid_request(INVALID_REQUEST)),
    }
}

/// Extract and validate the request's token
///
/// Extraction failures become 400 responses, validation failures 500.
pub fn authenticate(tokens: &dyn TokenService, request: &Request) -> Result<TokenInfo, ApiError> {
    let token = extract_token(request.uri(), request.headers()).map_err(|e| {
        warn!(error = %e, "Token extraction failed");
        ApiError::from(e)
    })?;

    tokens.validate_token(&token).map_err(|e| {
        error!(error = %e, "Token validation failed");
        ApiError::from(e)
    })
}

/// Admit any request carrying a valid token
pub async fn authentication_middleware(
    State(tokens): State<SharedTokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let info = authenticate(tokens.as_ref(), &request)?;

    if !info.valid {
        warn!("Rejected token without a usable identity");
        return Err(ApiError::unauthorized(UNAUTHORIZED));
    }

    debug!(subject_id = info.subject_id, role = %info.role, "Request authenticated");

    request.extensions_mut().insert(info);
    Ok(next.run(request).await)
}

/// Role policy for [`authorization_middleware`]
#[derive(Debug, Clone)]
pub struct RoleGate {
    tokens: SharedTokenService,
    allowed_roles: Arc<[String]>,
}

impl RoleGate {
    pub fn new<I, S>(tokens: SharedTokenService, allowed_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens,
            allowed_roles: allowed_roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed_roles(&self) -> &[String] {
        &self.allowed_roles
    }

    /// A token passes only when it is valid and its role is allowed
    pub fn permits(&self, info: &TokenInfo) -> bool {
        info.has_any_role(self.allowed_roles())
    }
}

/// Admit requests whose valid token carries one of the gate's roles
pub async fn authorization_middleware(
    State(gate): State<RoleGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let info = authenticate(gate.tokens.as_ref(), &request)?;

    if !gate.permits(&info) {
        warn!(
            valid = info.valid,
            subject_id = info.subject_id,
            role = %info.role,
            "Access denied"
        );
        return Err(ApiError::unauthorized(ACCESS_DENIED));
    }

    debug!(subject_id = info.subject_id, role = %info.role, "Request authorized");

    request.extensions_mut().insert(info);
    Ok(next.run(request).await)
}

/// Extractor for the identity attached by either middleware
#[derive(Debug, Clone)]
pub struct CurrentToken(pub TokenInfo);

impl<S> FromRequestParts<S> for CurrentToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenInfo>()
            .cloned()
            .map(CurrentToken)
            .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))
    }
}
