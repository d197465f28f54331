//! JWT token generation and validation with a shared HMAC secret

use chrono::{Duration, SecondsFormat, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use tracing::debug;

use crate::domain::{DomainError, TokenInfo};

/// Algorithm used when issuing tokens
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// Only the HMAC family verifies against a shared secret
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Longest accepted token lifetime (ten years)
pub const MAX_EXPIRATION_MINUTES: u64 = 60 * 24 * 366 * 10;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject identifier
    pub user_id: u32,
    /// Role name
    pub role: String,
    /// Advisory expiry as RFC 3339, kept for existing consumers
    pub expiration: String,
    /// Expiration timestamp (Unix epoch), enforced on validation
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims expiring `expiration_minutes` from now
    ///
    /// Fails when the expiry is not representable as a timestamp.
    pub fn new(
        subject_id: u32,
        role: impl Into<String>,
        expiration_minutes: u64,
    ) -> Result<Self, DomainError> {
        let expires_at = i64::try_from(expiration_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                DomainError::token(format!(
                    "Token lifetime of {} minutes is out of range",
                    expiration_minutes
                ))
            })?;

        Ok(Self {
            user_id: subject_id,
            role: role.into(),
            expiration: expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            exp: expires_at.timestamp(),
        })
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_minutes: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes,
        }
    }
}

/// Trait for issuing and validating bearer tokens
pub trait TokenService: Send + Sync + Debug {
    /// Issue a signed token for a subject and role
    fn generate_token(&self, subject_id: u32, role: &str) -> Result<String, DomainError>;

    /// Validate a token and extract its identity
    ///
    /// Signature, format, algorithm and expiry failures are errors. A token
    /// that verifies but carries unusable claims yields an invalid
    /// `TokenInfo` instead.
    fn validate_token(&self, token: &str) -> Result<TokenInfo, DomainError>;

    /// Lifetime of issued tokens in minutes
    fn expiration_minutes(&self) -> u64;
}

/// Token service backed by a single static secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("secret", &"[hidden]")
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.validate_exp = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }
}

impl TokenService for JwtService {
    fn generate_token(&self, subject_id: u32, role: &str) -> Result<String, DomainError> {
        let claims = TokenClaims::new(subject_id, role, self.config.expiration_minutes)?;

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| DomainError::token(format!("Failed to generate JWT: {}", e)))
    }

    fn validate_token(&self, token: &str) -> Result<TokenInfo, DomainError> {
        let token_data = decode::<Value>(token, &self.decoding_key, &self.validation)
            .map_err(|e| DomainError::token(format!("Invalid JWT: {}", e)))?;

        Ok(token_info_from_claims(&token_data.claims))
    }

    fn expiration_minutes(&self) -> u64 {
        self.config.expiration_minutes
    }
}

fn token_info_from_claims(claims: &Value) -> TokenInfo {
    let Some(claims) = claims.as_object() else {
        debug!("Token claims are not an object");
        return TokenInfo::invalid();
    };

    let Some(subject_id) = claims.get("user_id").and_then(subject_id_from) else {
        debug!("Token has no usable user_id claim");
        return TokenInfo::invalid();
    };

    let Some(role) = claims.get("role").and_then(Value::as_str) else {
        debug!(subject_id, "Token has no string role claim");
        return TokenInfo::invalid();
    };

    TokenInfo::authenticated(subject_id, role)
}

/// Numeric subject ids are rounded half to even and must fit in u32
///
/// Any negative number is rejected, including values that would round to
/// zero such as `-0.4`.
fn subject_id_from(value: &Value) -> Option<u32> {
    if let Some(id) = value.as_u64() {
        return u32::try_from(id).ok();
    }

    let id = value.as_f64()?;
    if id.is_sign_negative() {
        return None;
    }

    let rounded = id.round_ties_even();
    (rounded <= f64::from(u32::MAX)).then_some(rounded as u32)
}
