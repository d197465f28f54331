//! Authentication infrastructure module
//!
//! This module provides JWT token issuing and validation.

mod jwt;

pub use jwt::{JwtConfig, JwtService, TokenClaims, TokenService, MAX_EXPIRATION_MINUTES};
