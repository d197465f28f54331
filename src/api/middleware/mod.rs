//! API middleware components

pub mod logging;
pub mod token_auth;

pub use logging::logging_middleware;
pub use token_auth::{
    authenticate, authentication_middleware, authorization_middleware, extract_token,
    CurrentToken, RoleGate, SharedTokenService,
};
