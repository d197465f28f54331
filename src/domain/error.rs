use std::path::{Path, PathBuf};

use thiserror::Error;

use super::template::TemplateError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    #[error("Token error: {message}")]
    Token { message: String },

    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    pub fn token(message: impl Into<String>) -> Self {
        Self::Token {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Underlying I/O error kind, if this error came from the filesystem
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_includes_path() {
        let error = DomainError::io(
            "/tmp/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(error.to_string(), "I/O error on '/tmp/missing': no such file");
        assert_eq!(error.io_kind(), Some(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_token_error() {
        let error = DomainError::token("InvalidSignature");
        assert_eq!(error.to_string(), "Token error: InvalidSignature");
        assert!(error.io_kind().is_none());
    }

    #[test]
    fn test_invalid_request_message_is_bare() {
        let error = DomainError::invalid_request("invalid request");
        assert_eq!(error.to_string(), "invalid request");
    }

    #[test]
    fn test_template_error_conversion() {
        let error: DomainError = TemplateError::MissingVariable {
            name: "name".to_string(),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Template error: Missing required variable: name"
        );
    }
}
