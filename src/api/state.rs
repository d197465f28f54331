//! Application state for shared services

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtService;

use super::middleware::SharedTokenService;

/// Application state shared by the router
#[derive(Debug, Clone)]
pub struct AppState {
    pub tokens: SharedTokenService,
    pub admin_roles: Vec<String>,
}

impl AppState {
    pub fn new(tokens: SharedTokenService, admin_roles: Vec<String>) -> Self {
        Self { tokens, admin_roles }
    }

    /// Build the state from auth configuration
    pub fn from_config(auth: &AuthConfig) -> Result<Self, DomainError> {
        let tokens = Arc::new(JwtService::new(auth.jwt_config()?));
        Ok(Self::new(tokens, auth.admin_roles.clone()))
    }
}
