//! Token identity attached to authenticated requests

use serde::{Deserialize, Serialize};

/// Outcome of validating a bearer token
///
/// A token that parses and verifies but carries unusable claims produces
/// `valid == false` rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub valid: bool,
    pub subject_id: u32,
    pub role: String,
}

impl TokenInfo {
    /// A validated identity
    pub fn authenticated(subject_id: u32, role: impl Into<String>) -> Self {
        Self {
            valid: true,
            subject_id,
            role: role.into(),
        }
    }

    /// Recognized token without a usable identity
    pub fn invalid() -> Self {
        Self::default()
    }

    /// True when the token is valid and its role is one of `allowed`
    pub fn has_any_role<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        self.valid && allowed.iter().any(|role| role.as_ref() == self.role)
    }
}
