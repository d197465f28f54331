use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::auth::{JwtConfig, MAX_EXPIRATION_MINUTES};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Token signing settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration_minutes: u64,
    /// Roles admitted to the admin routes
    pub admin_roles: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_minutes: 10,
            admin_roles: vec!["admin".to_string()],
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[hidden]")
            .field("expiration_minutes", &self.expiration_minutes)
            .field("admin_roles", &self.admin_roles)
            .finish()
    }
}

impl AuthConfig {
    /// Build the signing configuration
    ///
    /// An empty secret or a lifetime outside `1..=MAX_EXPIRATION_MINUTES` is
    /// rejected.
    pub fn jwt_config(&self) -> Result<JwtConfig, DomainError> {
        if self.secret.trim().is_empty() {
            return Err(DomainError::configuration(
                "auth.secret must be set (e.g. APP__AUTH__SECRET)",
            ));
        }

        if self.expiration_minutes == 0 {
            return Err(DomainError::configuration(
                "auth.expiration_minutes must be greater than zero",
            ));
        }

        if self.expiration_minutes > MAX_EXPIRATION_MINUTES {
            return Err(DomainError::configuration(format!(
                "auth.expiration_minutes must not exceed {}",
                MAX_EXPIRATION_MINUTES
            )));
        }

        Ok(JwtConfig::new(self.secret.clone(), self.expiration_minutes))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.admin_roles")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.auth.expiration_minutes, 10);
        assert_eq!(config.auth.admin_roles, vec!["admin".to_string()]);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let auth = AuthConfig::default();
        assert!(matches!(
            auth.jwt_config(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_zero_expiration_rejected() {
        let auth = AuthConfig {
            secret: "secret".to_string(),
            expiration_minutes: 0,
            ..AuthConfig::default()
        };
        assert!(auth.jwt_config().is_err());
    }

    #[test]
    fn test_excessive_expiration_rejected() {
        for minutes in [MAX_EXPIRATION_MINUTES + 1, 200_000_000_000, u64::MAX] {
            let auth = AuthConfig {
                secret: "secret".to_string(),
                expiration_minutes: minutes,
                ..AuthConfig::default()
            };
            assert!(matches!(
                auth.jwt_config(),
                Err(DomainError::Configuration { .. })
            ));
        }

        let auth = AuthConfig {
            secret: "secret".to_string(),
            expiration_minutes: MAX_EXPIRATION_MINUTES,
            ..AuthConfig::default()
        };
        assert!(auth.jwt_config().is_ok());
    }

    #[test]
    fn test_jwt_config() {
        let auth = AuthConfig {
            secret: "secret".to_string(),
            ..AuthConfig::default()
        };
        let jwt = auth.jwt_config().unwrap();
        assert_eq!(jwt.secret, "secret");
        assert_eq!(jwt.expiration_minutes, 10);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: AppConfig = serde_json::from_str(
            r#"{"auth": {"secret": "s3cret", "admin_roles": ["admin", "ops"]}, "logging": {"format": "json"}}"#,
        )
        .unwrap();

        assert_eq!(config.auth.secret, "s3cret");
        assert_eq!(config.auth.admin_roles.len(), 2);
        assert_eq!(config.auth.expiration_minutes, 10);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_debug_hides_secret() {
        let auth = AuthConfig {
            secret: "very-secret".to_string(),
            ..AuthConfig::default()
        };
        assert!(!format!("{:?}", auth).contains("very-secret"));
    }
}
